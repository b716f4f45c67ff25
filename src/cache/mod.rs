//! In-memory translation status cache.
//!
//! Holds the records fetched from the Kleio server, the per-status directory
//! closure derived from them, and the set of scopes already fetched this
//! session. Rendering code only ever reads from here; every network failure
//! is absorbed and surfaced through [`StatusCache::placeholder_message`].
//!
//! ```text
//! refresh(scope) ─┬─ fetched? ──────────────────────────────▶ Cached
//!                 └─ lock(scope) ─ get() ─ merge ─ rebuild dirs ─ swap ─ notify
//! ```

mod dirs;
mod record;

pub use dirs::{DirectorySets, derive_directory_sets};
pub use record::StatusRecord;

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tokio::sync::watch;

use crate::core::StatusCode;
use crate::service::{FailureKind, StatusClient};
use crate::{debug, log};

/// Placeholder shown when a listing is empty
pub const PLACEHOLDER_EMPTY: &str = "0 files";
/// Placeholder shown while a scope is being fetched
pub const PLACEHOLDER_LOADING: &str = "Loading Status from Kleio Server…";
/// Placeholder shown when the server could not be reached
pub const PLACEHOLDER_REFUSED: &str = "Connection refused by Kleio Server.";
/// Placeholder shown when the server answered with an error
pub const PLACEHOLDER_SERVER_ERROR: &str = "Kleio Server error.";

/// Result of a [`StatusCache::refresh`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Scope was already fetched; no network access
    Cached,
    /// Scope fetched; number of records received
    Fetched(usize),
    /// Fetch failed; records left untouched
    Failed(FailureKind),
}

/// Translation status cache shared by every tree view.
pub struct StatusCache<C> {
    client: C,
    /// source_url → record
    records: Mutex<FxHashMap<String, StatusRecord>>,
    /// Rebuilt on every merge and swapped in whole
    dirs: ArcSwap<DirectorySets>,
    /// Scopes whose remote query completed
    fetched: Mutex<FxHashSet<String>>,
    /// Per-scope gate serializing concurrent refreshes of the same scope,
    /// removed once no refresh holds it
    inflight: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
    placeholder: Mutex<String>,
    /// Bumped after every state change
    revision: watch::Sender<u64>,
}

impl<C: StatusClient> StatusCache<C> {
    pub fn new(client: C) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            client,
            records: Mutex::new(FxHashMap::default()),
            dirs: ArcSwap::from_pointee(DirectorySets::default()),
            fetched: Mutex::new(FxHashSet::default()),
            inflight: DashMap::new(),
            placeholder: Mutex::new(PLACEHOLDER_EMPTY.to_string()),
            revision,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Load status for `scope` unless it was already fetched this session.
    ///
    /// Never fails: errors are classified into the placeholder message and
    /// reported through the returned outcome.
    pub async fn refresh(&self, scope: &str) -> RefreshOutcome {
        if self.is_fetched(scope) {
            debug!("status"; "cached: {}", scope);
            return RefreshOutcome::Cached;
        }

        let gate = Arc::clone(self.inflight.entry(scope.to_string()).or_default().value());
        let outcome = {
            let _guard = gate.lock().await;
            // Another refresh of the same scope may have finished while we waited
            if self.is_fetched(scope) {
                debug!("status"; "cached after wait: {}", scope);
                RefreshOutcome::Cached
            } else {
                self.fetch(scope).await
            }
        };

        // Drop the gate unless another refresh of this scope is waiting on it
        drop(gate);
        self.inflight
            .remove_if(scope, |_, gate| Arc::strong_count(gate) == 1);
        outcome
    }

    async fn fetch(&self, scope: &str) -> RefreshOutcome {
        self.set_placeholder(PLACEHOLDER_LOADING);
        self.bump();
        debug!("status"; "loading: {}", scope);

        let outcome = match self.client.get(scope, None).await {
            Ok(records) => {
                let count = records.len();
                self.merge(records);
                self.set_placeholder(PLACEHOLDER_EMPTY);
                self.fetched.lock().insert(scope.to_string());
                debug!("status"; "loaded {} records for {}", count, scope);
                RefreshOutcome::Fetched(count)
            }
            Err(err) => {
                log!("error"; "status for {}: {}", scope, err);
                let kind = err.kind();
                self.set_placeholder(match kind {
                    FailureKind::Unavailable => PLACEHOLDER_REFUSED,
                    FailureKind::Remote => PLACEHOLDER_SERVER_ERROR,
                });
                RefreshOutcome::Failed(kind)
            }
        };

        self.bump();
        outcome
    }

    /// Callback form of [`refresh`](Self::refresh): `on_done` runs exactly
    /// once whether the scope was cached, fetched, or failed.
    pub async fn refresh_with(&self, scope: &str, on_done: impl FnOnce()) -> RefreshOutcome {
        let outcome = self.refresh(scope).await;
        on_done();
        outcome
    }
}

impl<C> StatusCache<C> {
    /// Forget that `scope` was fetched so the next refresh hits the server.
    ///
    /// Only the exact entry is removed; nested or parent scopes are kept.
    pub fn invalidate(&self, scope: &str) -> bool {
        let removed = self.fetched.lock().remove(scope);
        if removed {
            debug!("status"; "invalidated: {}", scope);
        }
        removed
    }

    /// Status of the record whose `path` is a suffix of `file_path`.
    ///
    /// When several records match, the longest (most specific) path wins.
    pub fn query(&self, file_path: &str) -> Option<StatusCode> {
        self.records
            .lock()
            .values()
            .filter(|record| record.matches(file_path))
            .max_by(|a, b| {
                a.path
                    .len()
                    .cmp(&b.path.len())
                    .then_with(|| b.source_url.cmp(&a.source_url))
            })
            .map(|record| record.status)
    }

    /// Does the subtree rooted at `dir` contain a file with `status`?
    pub fn contains_status(&self, dir: &str, status: StatusCode) -> bool {
        self.dirs.load().contains(dir, status)
    }

    /// Current directory closure (a complete snapshot).
    pub fn directory_sets(&self) -> Arc<DirectorySets> {
        self.dirs.load_full()
    }

    /// Snapshot of all records, ordered by `source_url`.
    pub fn records(&self) -> Vec<StatusRecord> {
        let mut records: Vec<_> = self.records.lock().values().cloned().collect();
        records.sort_by(|a, b| a.source_url.cmp(&b.source_url));
        records
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn is_fetched(&self, scope: &str) -> bool {
        self.fetched.lock().contains(scope)
    }

    pub fn fetched_scopes(&self) -> Vec<String> {
        let mut scopes: Vec<_> = self.fetched.lock().iter().cloned().collect();
        scopes.sort();
        scopes
    }

    /// Last user-facing status summary.
    pub fn placeholder_message(&self) -> String {
        self.placeholder.lock().clone()
    }

    /// Receive a new revision number after every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Reset everything (workspace change).
    pub fn clear(&self) {
        {
            let mut records = self.records.lock();
            records.clear();
            self.dirs.store(Arc::new(DirectorySets::default()));
        }
        self.fetched.lock().clear();
        self.set_placeholder(PLACEHOLDER_EMPTY);
        debug!("status"; "cache cleared");
        self.bump();
    }

    /// Merge records by `source_url` and rebuild the directory closure.
    ///
    /// Insert replaces in place, so no key is ever present twice. The new
    /// closure is built while the table is locked, then swapped in whole.
    fn merge(&self, incoming: Vec<StatusRecord>) {
        let mut records = self.records.lock();
        for record in incoming {
            records.insert(record.source_url.clone(), record);
        }
        let sets = derive_directory_sets(records.values());
        self.dirs.store(Arc::new(sets));
    }

    fn set_placeholder(&self, message: &str) {
        *self.placeholder.lock() = message.to_string();
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}
