//! `kleio diagnostics`: read translation reports next to source files.
//!
//! Works offline; only the report files are consulted.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::args::DiagnosticsArgs;
use super::common::resolve;
use crate::config::KleioConfig;
use crate::diagnostics::{AnchorPolicy, Diagnostic, ReportFiles, Severity};

#[derive(Debug, Serialize)]
struct FileDiagnostics {
    path: PathBuf,
    /// `None` when the file has no report yet
    diagnostics: Option<Vec<Diagnostic>>,
}

pub async fn run_diagnostics(args: &DiagnosticsArgs, config: &KleioConfig) -> Result<()> {
    let files = config.diagnostics.report_files();
    let policy = config.diagnostics.policy();

    let mut results = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let source = resolve(config, Some(path))?;
        results.push(collect(&files, &policy, &source).await?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        print_file(result);
    }

    let errors = results
        .iter()
        .filter_map(|r| r.diagnostics.as_ref())
        .flatten()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if errors > 0 {
        crate::log!("diagnostics"; "{} error{}", errors, if errors == 1 { "" } else { "s" });
    }
    Ok(())
}

async fn collect(
    files: &ReportFiles,
    policy: &AnchorPolicy,
    source: &Path,
) -> Result<FileDiagnostics> {
    // Accept the report itself as well as the source
    let source = if files.is_report(source) {
        files.source_for(source)
    } else {
        source.to_path_buf()
    };
    if !files.is_source(&source) {
        crate::debug!("diagnostics"; "not a .{} file: {}", files.source_extension, source.display());
    }
    let diagnostics = files
        .diagnostics_for(&source, policy)
        .await
        .with_context(|| format!("failed to read {}", source.display()))?;
    Ok(FileDiagnostics {
        path: source,
        diagnostics,
    })
}

fn print_file(result: &FileDiagnostics) {
    let Some(diagnostics) = &result.diagnostics else {
        println!("{}: {}", result.path.display(), "no report".dimmed());
        return;
    };
    if diagnostics.is_empty() {
        println!("{}: {}", result.path.display(), "clean".green());
        return;
    }
    for diagnostic in diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => diagnostic.severity.as_str().red().bold().to_string(),
            Severity::Warning => diagnostic.severity.as_str().yellow().bold().to_string(),
        };
        println!(
            "{}:{}:{}: {}: {}",
            result.path.display(),
            diagnostic.line,
            diagnostic.column_start + 1,
            severity,
            diagnostic.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_collect_from_source_or_report() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.cli");
        fs::write(&source, "\n\nfoo();\n").unwrap();
        fs::write(dir.path().join("a.rpt"), "ERROR: bad token line 3 \n").unwrap();

        let files = ReportFiles::default();
        let policy = AnchorPolicy::default();

        let from_source = collect(&files, &policy, &source).await.unwrap();
        let from_report = collect(&files, &policy, &dir.path().join("a.rpt"))
            .await
            .unwrap();

        assert_eq!(from_source.path, source);
        assert_eq!(from_report.path, source);
        let diagnostics = from_source.diagnostics.unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
        assert_eq!(from_report.diagnostics.unwrap(), diagnostics);
    }

    #[tokio::test]
    async fn test_collect_without_report() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("b.cli");
        fs::write(&source, "x\n").unwrap();

        let result = collect(&ReportFiles::default(), &AnchorPolicy::default(), &source)
            .await
            .unwrap();
        assert!(result.diagnostics.is_none());
    }
}
