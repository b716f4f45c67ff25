//! Per-status directory closure.
//!
//! For each status, the set of directories that contain (directly or in any
//! subdirectory) at least one file with that status. Built from scratch
//! from the record table; never patched incrementally.
//!
//! ```text
//! record: directory = "a/b/c", status = E
//! E -> { "a/b/c", "a/b", "a", "" }
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use super::StatusRecord;
use crate::core::StatusCode;
use crate::core::path::{ancestors, dir_key};

/// Directory keys per status (keys normalized by [`dir_key`], root = `""`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectorySets(FxHashMap<StatusCode, FxHashSet<String>>);

impl DirectorySets {
    /// Does the subtree rooted at `dir` hold any file with `status`?
    pub fn contains(&self, dir: &str, status: StatusCode) -> bool {
        self.0
            .get(&status)
            .is_some_and(|dirs| dirs.contains(&dir_key(dir)))
    }

    /// All directories recorded for `status`.
    pub fn dirs(&self, status: StatusCode) -> Option<&FxHashSet<String>> {
        self.0.get(&status)
    }

    /// Statuses present somewhere under `dir`, in code order.
    pub fn statuses_under(&self, dir: &str) -> Vec<StatusCode> {
        let key = dir_key(dir);
        let mut found: Vec<_> = self
            .0
            .iter()
            .filter(|(_, dirs)| dirs.contains(&key))
            .map(|(status, _)| *status)
            .collect();
        found.sort();
        found
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the directory closure for a set of records.
pub fn derive_directory_sets<'a>(
    records: impl IntoIterator<Item = &'a StatusRecord>,
) -> DirectorySets {
    let mut sets: FxHashMap<StatusCode, FxHashSet<String>> = FxHashMap::default();

    for record in records {
        let dirs = sets.entry(record.status).or_default();
        let key = dir_key(&record.directory);
        for dir in ancestors(&key) {
            // Ancestors of a known directory are already present
            if !dirs.insert(dir.to_string()) {
                break;
            }
        }
    }

    DirectorySets(sets)
}
