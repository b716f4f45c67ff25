//! `kleio tree`: the workspace as a status-annotated tree.

use std::io;
use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use super::args::TreeArgs;
use super::common::{connect, load_scope, resolve};
use crate::cache::StatusCache;
use crate::config::KleioConfig;
use crate::core::StatusCode;
use crate::tree::{Listing, TreeView};

pub async fn run_tree(args: &TreeArgs, config: &KleioConfig) -> Result<()> {
    let dir = resolve(config, args.path.as_deref())?;
    let cache = StatusCache::new(connect(config)?);

    // Statuses come from the whole workspace so ancestors of `dir` resolve too
    if !load_scope(&cache, config, &config.connection.mhk_home).await {
        crate::log!("error"; "{}", cache.placeholder_message());
    }

    let view = TreeView::new(&cache, &config.connection.mhk_home);
    println!("{}", dir.display().bold());
    for line in render(&view, &dir, args.status, args.depth)? {
        println!("{line}");
    }
    Ok(())
}

/// Render `dir` as indented tree lines.
///
/// An empty top-level listing renders as the cache's placeholder message.
pub fn render<C>(
    view: &TreeView<'_, C>,
    dir: &Path,
    filter: Option<StatusCode>,
    depth: usize,
) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    match view.listing(dir, filter)? {
        Listing::Placeholder(message) => lines.push(message),
        Listing::Entries(_) => render_into(view, dir, filter, depth, "", &mut lines)?,
    }
    Ok(lines)
}

fn render_into<C>(
    view: &TreeView<'_, C>,
    dir: &Path,
    filter: Option<StatusCode>,
    depth: usize,
    indent: &str,
    lines: &mut Vec<String>,
) -> io::Result<()> {
    if depth == 0 {
        return Ok(());
    }
    let entries = view.children(dir, filter)?;
    let count = entries.len();

    for (i, entry) in entries.into_iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        let line = match (entry.is_dir(), entry.label()) {
            (true, _) => format!("{indent}{branch}{}/", entry.name),
            (false, Some(label)) => format!("{indent}{branch}{}  {label}", entry.name),
            (false, None) => format!("{indent}{branch}{}", entry.name),
        };
        lines.push(line);

        if entry.is_dir() {
            let nested = format!("{indent}{}", if last { "    " } else { "│   " });
            render_into(view, &entry.path, filter, depth - 1, &nested, lines)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{PLACEHOLDER_EMPTY, StatusRecord};
    use crate::service::{ServiceError, StatusClient};
    use std::fs;
    use tempfile::TempDir;

    struct FixedClient(Vec<StatusRecord>);

    impl StatusClient for FixedClient {
        async fn get(
            &self,
            _path: &str,
            _status: Option<StatusCode>,
        ) -> Result<Vec<StatusRecord>, ServiceError> {
            Ok(self.0.clone())
        }
    }

    async fn fixture() -> (TempDir, StatusCache<FixedClient>) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sources/demo")).unwrap();
        fs::write(dir.path().join("sources/a.cli"), "").unwrap();
        fs::write(dir.path().join("sources/demo/b.cli"), "").unwrap();

        let cache = StatusCache::new(FixedClient(vec![
            StatusRecord::new("/r/a", "sources", "sources/a.cli", StatusCode::Errors),
            StatusRecord::new("/r/b", "sources/demo", "sources/demo/b.cli", StatusCode::Warnings),
        ]));
        cache.refresh("").await;
        (dir, cache)
    }

    #[tokio::test]
    async fn test_render_full_tree() {
        let (dir, cache) = fixture().await;
        let view = TreeView::new(&cache, dir.path());

        let lines = render(&view, dir.path(), None, usize::MAX).unwrap();
        assert_eq!(
            lines,
            vec![
                "└── sources/",
                "    ├── demo/",
                "    │   └── b.cli  With warnings",
                "    └── a.cli  With errors",
            ]
        );
    }

    #[tokio::test]
    async fn test_render_filtered_and_limited() {
        let (dir, cache) = fixture().await;
        let view = TreeView::new(&cache, dir.path());

        let lines = render(&view, dir.path(), Some(StatusCode::Errors), 2).unwrap();
        assert_eq!(lines, vec!["└── sources/", "    └── a.cli  With errors"]);

        let lines = render(&view, dir.path(), None, 1).unwrap();
        assert_eq!(lines, vec!["└── sources/"]);
    }

    #[tokio::test]
    async fn test_render_placeholder() {
        let (dir, cache) = fixture().await;
        let view = TreeView::new(&cache, dir.path());

        let lines = render(&view, dir.path(), Some(StatusCode::Queued), usize::MAX).unwrap();
        assert_eq!(lines, vec![PLACEHOLDER_EMPTY]);
    }
}
