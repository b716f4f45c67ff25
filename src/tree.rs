//! Directory listings annotated with translation status.
//!
//! A [`TreeView`] reads the local file system and the [`StatusCache`]; it
//! never talks to the server itself. Directory keys are taken relative to
//! the view's root (the mhk home), which is how the server reports them.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cache::StatusCache;
use crate::core::StatusCode;
use crate::core::path::{dir_key, to_unix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Directory,
    File,
}

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Known status of a file (directories have none)
    pub status: Option<StatusCode>,
}

impl TreeEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Status description shown next to the name, e.g. `"With errors"`.
    pub fn label(&self) -> Option<&'static str> {
        self.status.map(StatusCode::label)
    }
}

/// What a tree node shows: its children, or a single message when there
/// are none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Entries(Vec<TreeEntry>),
    Placeholder(String),
}

pub struct TreeView<'a, C> {
    cache: &'a StatusCache<C>,
    root: PathBuf,
}

impl<'a, C> TreeView<'a, C> {
    pub fn new(cache: &'a StatusCache<C>, root: impl Into<PathBuf>) -> Self {
        Self {
            cache,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Children of `dir`, filtered by `filter` and sorted directories first.
    ///
    /// Hidden entries are skipped. With a filter, directories are kept only
    /// if their subtree holds a file with that status, and files only if
    /// their own status matches.
    pub fn children(&self, dir: &Path, filter: Option<StatusCode>) -> io::Result<Vec<TreeEntry>> {
        let sets = self.cache.directory_sets();
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            let item = if path.is_dir() {
                if let Some(status) = filter
                    && !sets.contains(&self.key(&path), status)
                {
                    continue;
                }
                TreeEntry {
                    name,
                    path,
                    kind: EntryKind::Directory,
                    status: None,
                }
            } else {
                let status = self.cache.query(&path.to_string_lossy());
                if filter.is_some() && status != filter {
                    continue;
                }
                TreeEntry {
                    name,
                    path,
                    kind: EntryKind::File,
                    status,
                }
            };
            entries.push(item);
        }

        entries.sort_by(compare_entries);
        Ok(entries)
    }

    /// [`children`](Self::children), or the cache's placeholder message
    /// when nothing is left to show.
    pub fn listing(&self, dir: &Path, filter: Option<StatusCode>) -> io::Result<Listing> {
        let entries = self.children(dir, filter)?;
        Ok(if entries.is_empty() {
            Listing::Placeholder(self.cache.placeholder_message())
        } else {
            Listing::Entries(entries)
        })
    }

    /// Directory key of `path` relative to the root (`""` for the root).
    pub fn key(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        dir_key(&to_unix(&relative.to_string_lossy()))
    }
}

fn compare_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
    a.kind
        .cmp(&b.kind)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
