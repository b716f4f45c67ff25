//! Per-document diagnostic sets.
//!
//! Extraction requests for one document may overlap (the report changes
//! while the previous read is still in flight). Each request takes a
//! [`Ticket`]; only the ticket issued last for a document may publish, so
//! a slow result for older input never overwrites a newer one.

use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::{AnchorPolicy, Diagnostic, ReportFiles};

/// Permission to publish diagnostics for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    path: PathBuf,
    generation: u64,
}

impl Ticket {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Default)]
struct DocumentState {
    /// Last generation handed out
    issued: u64,
    diagnostics: Option<Vec<Diagnostic>>,
}

/// Diagnostics for every known document.
#[derive(Debug, Default)]
pub struct DiagnosticStore {
    docs: Mutex<FxHashMap<PathBuf, DocumentState>>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an extraction for `path`, superseding earlier tickets.
    pub fn begin(&self, path: &Path) -> Ticket {
        let mut docs = self.docs.lock();
        let state = docs.entry(path.to_path_buf()).or_default();
        state.issued += 1;
        Ticket {
            path: path.to_path_buf(),
            generation: state.issued,
        }
    }

    /// Replace the document's set if `ticket` is still the latest.
    ///
    /// Returns `false` (and drops `diagnostics`) for a superseded ticket.
    pub fn publish(&self, ticket: &Ticket, diagnostics: Vec<Diagnostic>) -> bool {
        let mut docs = self.docs.lock();
        match docs.get_mut(&ticket.path) {
            Some(state) if state.issued == ticket.generation => {
                state.diagnostics = Some(diagnostics);
                true
            }
            _ => {
                crate::debug!("diagnostics"; "dropped stale result for {}", ticket.path.display());
                false
            }
        }
    }

    /// Read the report for `source` and publish its diagnostics.
    ///
    /// Returns the number of diagnostics published, or `None` if there is no
    /// report (the current set is left untouched) or a newer reload won.
    pub async fn reload(
        &self,
        files: &ReportFiles,
        source: &Path,
        policy: &AnchorPolicy,
    ) -> io::Result<Option<usize>> {
        let ticket = self.begin(source);
        let Some(diagnostics) = files.diagnostics_for(source, policy).await? else {
            return Ok(None);
        };
        let count = diagnostics.len();
        Ok(self.publish(&ticket, diagnostics).then_some(count))
    }

    /// Current set for `path`; `None` if nothing was ever published.
    pub fn get(&self, path: &Path) -> Option<Vec<Diagnostic>> {
        self.docs.lock().get(path)?.diagnostics.clone()
    }

    /// Forget the document's diagnostics (outstanding tickets become stale).
    pub fn clear(&self, path: &Path) {
        if let Some(state) = self.docs.lock().get_mut(path) {
            state.issued += 1;
            state.diagnostics = None;
        }
    }

    /// Documents with a published set, sorted.
    pub fn documents(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self
            .docs
            .lock()
            .iter()
            .filter(|(_, state)| state.diagnostics.is_some())
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        paths
    }
}
