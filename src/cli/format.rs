//! `kleio format`: re-indent Kleio sources by group level.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::args::FormatArgs;
use super::common::resolve;
use crate::config::KleioConfig;
use crate::diagnostics::ReportFiles;
use crate::format::format_source;

pub fn run_format(args: &FormatArgs, config: &KleioConfig) -> Result<()> {
    let files = config.diagnostics.report_files();

    let mut sources = Vec::new();
    for path in &args.paths {
        let path = resolve(config, Some(path))?;
        if path.is_dir() {
            collect_sources(&path, &files, &mut sources)
                .with_context(|| format!("failed to list {}", path.display()))?;
        } else {
            sources.push(path);
        }
    }

    let mut changed = 0;
    for source in &sources {
        if format_file(source, args.check)? {
            changed += 1;
        }
    }

    if args.check && changed > 0 {
        bail!("{} file{} need formatting", changed, if changed == 1 { "" } else { "s" });
    }
    if changed == 0 {
        crate::log!("format"; "{} file{} already formatted", sources.len(), if sources.len() == 1 { "" } else { "s" });
    }
    Ok(())
}

/// Format one file in place, or only report it with `check`.
///
/// Returns whether the content differs from its formatted form.
fn format_file(path: &Path, check: bool) -> Result<bool> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let formatted = format_source(&content);
    if formatted == content {
        crate::debug!("format"; "unchanged: {}", path.display());
        return Ok(false);
    }

    if check {
        crate::log!("format"; "would reformat {}", path.display());
    } else {
        fs::write(path, formatted).with_context(|| format!("failed to write {}", path.display()))?;
        crate::log!("format"; "formatted {}", path.display());
    }
    Ok(true)
}

/// Source files under `dir`, skipping hidden entries.
fn collect_sources(dir: &Path, files: &ReportFiles, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            collect_sources(&path, files, out)?;
        } else if files.is_source(&path) {
            out.push(path);
        }
    }
    Ok(())
}
