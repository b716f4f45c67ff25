//! Event coalescing for the report watcher.
//!
//! The server rewrites a report in several steps (truncate, write, rename),
//! so one translation produces a burst of events. The debouncer folds them
//! per path and releases the batch once the burst has been quiet for the
//! configured window.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Editor and server scratch files
pub fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bak" | "swp" | "swo" | "tmp" | "part")
        || name.ends_with('~')
        || name.starts_with('.')
}

pub struct Debouncer {
    window: Duration,
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            changes: FxHashMap::default(),
            last_event: None,
        }
    }

    /// Fold a notify event into the pending batch.
    ///
    /// Per path: a removal overrides earlier changes, a change after a
    /// removal replaces it, create-then-remove cancels out, and otherwise
    /// the first kind is kept.
    pub fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(notify::event::ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => ChangeKind::Modified,
            _ => return,
        };

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            self.add(path.clone(), kind);
        }
    }

    fn add(&mut self, path: PathBuf, kind: ChangeKind) {
        let next = match (self.changes.get(&path).copied(), kind) {
            (None, kind) => Some(kind),
            (Some(ChangeKind::Created), ChangeKind::Removed) => None,
            (Some(_), ChangeKind::Removed) => Some(ChangeKind::Removed),
            (Some(ChangeKind::Removed), kind) => Some(kind),
            (Some(existing), _) => Some(existing),
        };

        crate::debug!("watch"; "{}: {}", kind.label(), path.display());
        match next {
            Some(kind) => {
                self.changes.insert(path, kind);
            }
            None => {
                self.changes.remove(&path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    /// Take the batch once the window has passed since the last event.
    pub fn take_if_ready(&mut self) -> Option<Vec<(PathBuf, ChangeKind)>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;

        let mut changes: Vec<_> = std::mem::take(&mut self.changes).into_iter().collect();
        if changes.is_empty() {
            return None;
        }
        changes.sort_by(|a, b| a.0.cmp(&b.0));
        Some(changes)
    }

    fn is_ready(&self) -> bool {
        self.last_event
            .is_some_and(|last| last.elapsed() >= self.window)
    }

    /// Time until the pending batch may be ready.
    pub fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };
        self.window
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }

    pub fn pending(&self) -> usize {
        self.changes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    fn modify_kind() -> notify::EventKind {
        notify::EventKind::Modify(notify::event::ModifyKind::Data(
            notify::event::DataChange::Any,
        ))
    }

    fn create_kind() -> notify::EventKind {
        notify::EventKind::Create(notify::event::CreateKind::File)
    }

    fn remove_kind() -> notify::EventKind {
        notify::EventKind::Remove(notify::event::RemoveKind::File)
    }

    fn kind_of(debouncer: &Debouncer, path: &str) -> Option<ChangeKind> {
        debouncer.changes.get(Path::new(path)).copied()
    }

    #[test]
    fn test_empty_not_ready() {
        let mut debouncer = Debouncer::new(WINDOW);
        assert!(!debouncer.is_ready());
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_metadata_ignored() {
        let mut debouncer = Debouncer::new(WINDOW);
        let metadata = notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
            notify::event::MetadataKind::WriteTime,
        ));
        debouncer.add_event(&make_event(vec!["/w/a.rpt"], metadata));
        assert_eq!(debouncer.pending(), 0);
        assert!(debouncer.last_event.is_none());
    }

    #[test]
    fn test_temp_files_ignored() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.add_event(&make_event(
            vec!["/w/.a.rpt.swp", "/w/a.rpt~", "/w/a.tmp", "/w/a.rpt"],
            modify_kind(),
        ));
        assert_eq!(debouncer.pending(), 1);
    }

    #[test]
    fn test_first_kind_kept() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.add_event(&make_event(vec!["/w/a.rpt"], create_kind()));
        debouncer.add_event(&make_event(vec!["/w/a.rpt"], modify_kind()));
        assert_eq!(kind_of(&debouncer, "/w/a.rpt"), Some(ChangeKind::Created));
    }

    #[test]
    fn test_remove_transitions() {
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.add_event(&make_event(vec!["/w/a.rpt"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/w/a.rpt"], remove_kind()));
        assert_eq!(kind_of(&debouncer, "/w/a.rpt"), Some(ChangeKind::Removed));

        debouncer.add_event(&make_event(vec!["/w/a.rpt"], create_kind()));
        assert_eq!(kind_of(&debouncer, "/w/a.rpt"), Some(ChangeKind::Created));

        debouncer.add_event(&make_event(vec!["/w/a.rpt"], remove_kind()));
        assert_eq!(kind_of(&debouncer, "/w/a.rpt"), None);
    }

    #[test]
    fn test_take_after_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.add_event(&make_event(vec!["/w/b.rpt", "/w/a.rpt"], modify_kind()));
        assert!(debouncer.take_if_ready().is_none());

        std::thread::sleep(Duration::from_millis(20));
        let batch = debouncer.take_if_ready().unwrap();
        assert_eq!(
            batch,
            vec![
                (PathBuf::from("/w/a.rpt"), ChangeKind::Modified),
                (PathBuf::from("/w/b.rpt"), ChangeKind::Modified),
            ]
        );
        assert_eq!(debouncer.pending(), 0);
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_sleep_duration() {
        let mut debouncer = Debouncer::new(WINDOW);
        assert!(debouncer.sleep_duration() >= Duration::from_secs(3600));

        debouncer.last_event = Some(Instant::now());
        let dur = debouncer.sleep_duration();
        assert!(dur <= WINDOW);
        assert!(dur >= WINDOW - Duration::from_millis(50));
    }
}
