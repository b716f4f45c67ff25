//! `kleio watch`: follow translations as reports are written.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use super::common::{connect, load_scope, resolve};
use crate::cache::StatusCache;
use crate::config::KleioConfig;
use crate::diagnostics::DiagnosticStore;
use crate::watch::ReportWatcher;

pub async fn run_watch(path: Option<&Path>, config: &KleioConfig) -> Result<()> {
    let root = resolve(config, path)?;
    let cache = Arc::new(StatusCache::new(connect(config)?));
    let store = Arc::new(DiagnosticStore::new());

    if !load_scope(&cache, config, &root).await {
        crate::log!("error"; "{}", cache.placeholder_message());
    } else {
        crate::log!("status"; "{} files", cache.len());
    }

    crate::core::setup_shutdown_handler()?;

    let watcher = ReportWatcher::new(
        Arc::clone(&cache),
        store,
        config.diagnostics.report_files(),
        config.diagnostics.policy(),
    )
    .with_homes(&config.connection.mhk_home, config.connection.kleio_home.clone())
    .with_debounce(Duration::from_millis(config.watch.debounce_ms));

    watcher.run(&root).await
}
