//! `kleio translate`: start a translation on the server.

use anyhow::{Context, Result};

use super::common::{connect, resolve};
use crate::config::KleioConfig;

pub async fn run_translate(path: &std::path::Path, config: &KleioConfig) -> Result<()> {
    config.connection.require_token()?;

    let target = resolve(config, Some(path))?;
    let service_path = config.connection.service_path(&target);
    let client = connect(config)?;

    crate::log!("translate"; "{}", service_path);
    let response = client
        .translations_translate(&service_path)
        .await
        .with_context(|| format!("translation request for {} failed", target.display()))?;

    crate::debug!("translate"; "{}", response);
    crate::log!("translate"; "queued, run `kleio watch` to follow progress");
    Ok(())
}
