//! Common utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cache::{RefreshOutcome, StatusCache};
use crate::config::KleioConfig;
use crate::service::KleioClient;

/// Client for the configured Kleio server.
pub fn connect(config: &KleioConfig) -> Result<KleioClient> {
    let conn = &config.connection;
    KleioClient::new(&conn.url, &conn.rpc_path, conn.token.clone())
        .context("failed to create Kleio client")
}

/// Resolve a CLI path against the working directory.
///
/// `None` means the workspace root.
pub fn resolve(config: &KleioConfig, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => std::env::current_dir()
            .context("Failed to get current working directory")?
            .join(path),
        None => config.root.clone(),
    };
    Ok(path)
}

/// Refresh `dir`'s scope.
///
/// Returns `false` when the server could not answer; the cache's
/// placeholder message says why.
pub async fn load_scope(
    cache: &StatusCache<KleioClient>,
    config: &KleioConfig,
    dir: &Path,
) -> bool {
    let scope = config.connection.service_path(dir);
    crate::log!("status"; "Load Kleio Status: {}", scope);
    match cache.refresh(&scope).await {
        RefreshOutcome::Failed(_) => false,
        RefreshOutcome::Fetched(count) => {
            crate::debug!("status"; "{} records", count);
            true
        }
        RefreshOutcome::Cached => true,
    }
}
