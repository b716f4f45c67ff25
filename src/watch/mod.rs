//! Report watcher.
//!
//! Watches the workspace and reacts to translation reports:
//!
//! ```text
//! notify ─▶ Debouncer ─▶ *.rpt batch ─▶ translation complete?
//!                                         ├─ reload diagnostics (DiagnosticStore)
//!                                         └─ invalidate + refresh the source's directory scope
//! ```

mod debounce;

pub use debounce::{ChangeKind, Debouncer, is_temp_file};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::cache::StatusCache;
use crate::core::StatusCode;
use crate::core::path::service_path;
use crate::diagnostics::{AnchorPolicy, DiagnosticStore, ReportFiles};
use crate::logger::{status_error, status_success, status_warning};
use crate::service::StatusClient;
use crate::{debug, log};

/// What a report change amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    /// Report is newer than its source; diagnostics reloaded
    Completed {
        source: PathBuf,
        diagnostics: usize,
        status: Option<StatusCode>,
    },
    /// Report is older than its source (translation still running)
    Pending { source: PathBuf },
    /// Report deleted; diagnostics cleared
    Removed { source: PathBuf },
}

/// Reacts to report changes for one workspace.
pub struct ReportWatcher<C> {
    cache: Arc<StatusCache<C>>,
    store: Arc<DiagnosticStore>,
    files: ReportFiles,
    policy: AnchorPolicy,
    mhk_home: PathBuf,
    kleio_home: String,
    debounce: Duration,
}

impl<C: StatusClient> ReportWatcher<C> {
    pub fn new(
        cache: Arc<StatusCache<C>>,
        store: Arc<DiagnosticStore>,
        files: ReportFiles,
        policy: AnchorPolicy,
    ) -> Self {
        Self {
            cache,
            store,
            files,
            policy,
            mhk_home: PathBuf::new(),
            kleio_home: String::new(),
            debounce: Duration::from_millis(300),
        }
    }

    /// Map local paths to server scopes (`mhk_home` seen as `kleio_home`).
    pub fn with_homes(mut self, mhk_home: impl Into<PathBuf>, kleio_home: impl Into<String>) -> Self {
        self.mhk_home = mhk_home.into();
        self.kleio_home = kleio_home.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Cache scope covering `source`'s directory.
    pub fn scope_for(&self, source: &Path) -> String {
        let dir = source.parent().unwrap_or(source);
        service_path(dir, &self.mhk_home, &self.kleio_home)
    }

    /// Handle one report change.
    ///
    /// Returns `None` for paths that are not reports.
    pub async fn handle_report(&self, report: &Path) -> Result<Option<ReportEvent>> {
        if !self.files.is_report(report) {
            return Ok(None);
        }
        let source = self.files.source_for(report);
        let scope = self.scope_for(&source);

        if !report.exists() {
            self.store.clear(&source);
            self.cache.invalidate(&scope);
            return Ok(Some(ReportEvent::Removed { source }));
        }
        if !source.exists() {
            debug!("watch"; "report without source: {}", report.display());
            return Ok(None);
        }

        let completed = self
            .files
            .translation_completed(report)
            .await
            .with_context(|| format!("failed to stat {}", report.display()))?;
        if !completed {
            return Ok(Some(ReportEvent::Pending { source }));
        }

        log!("watch"; "translation completed: {}", source.display());

        let diagnostics = self
            .store
            .reload(&self.files, &source, &self.policy)
            .await
            .with_context(|| format!("failed to read {}", report.display()))?
            .unwrap_or(0);

        self.cache.invalidate(&scope);
        self.cache.refresh(&scope).await;
        let status = self.cache.query(&source.to_string_lossy());

        Ok(Some(ReportEvent::Completed {
            source,
            diagnostics,
            status,
        }))
    }

    /// Watch `root` until shutdown is requested.
    pub async fn run(&self, root: &Path) -> Result<()> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })
        .context("failed to create file watcher")?;
        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("failed to watch {}", root.display()))?;

        let (async_tx, mut async_rx) = tokio::sync::mpsc::channel::<notify::Event>(64);

        // notify is sync; bridge its channel onto the runtime
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => log!("watch"; "notify error: {}", e),
                }
            }
        });

        log!("watch"; "watching {} for .{} changes", root.display(), self.files.report_extension);

        let mut debouncer = Debouncer::new(self.debounce);
        loop {
            tokio::select! {
                biased;
                _ = crate::core::wait_shutdown() => break,
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    if let Some(batch) = debouncer.take_if_ready() {
                        self.process(batch).await;
                    }
                }
            }
        }

        drop(watcher);
        Ok(())
    }

    async fn process(&self, batch: Vec<(PathBuf, ChangeKind)>) {
        for (path, kind) in batch {
            if !self.files.is_report(&path) {
                continue;
            }
            debug!("watch"; "report {}: {}", kind.label(), path.display());

            match self.handle_report(&path).await {
                Ok(Some(event)) => display_event(&event),
                Ok(None) => {}
                Err(e) => status_error(&format!("failed: {}", path.display()), &format!("{e:#}")),
            }
        }
    }
}

fn display_event(event: &ReportEvent) {
    match event {
        ReportEvent::Completed {
            source,
            diagnostics,
            status,
        } => {
            let label = status.map_or("unknown status", StatusCode::label);
            status_success(&format!(
                "{}: {} ({} diagnostics)",
                source.display(),
                label,
                diagnostics
            ));
        }
        ReportEvent::Pending { source } => {
            debug!("watch"; "translation pending: {}", source.display());
        }
        ReportEvent::Removed { source } => {
            status_warning(&format!("report removed: {}", source.display()));
        }
    }
}
