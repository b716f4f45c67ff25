//! Report files next to source files.
//!
//! The server writes `name.rpt` beside `name.cli`. A missing report is not an
//! error: it means no translation has produced diagnostics yet.

use std::io;
use std::path::{Path, PathBuf};

use super::{AnchorPolicy, Diagnostic, extract_with};

/// Extension pair linking sources to their reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub report_extension: String,
    pub source_extension: String,
}

impl Default for ReportFiles {
    fn default() -> Self {
        Self::new("rpt", "cli")
    }
}

impl ReportFiles {
    pub fn new(report_extension: impl Into<String>, source_extension: impl Into<String>) -> Self {
        Self {
            report_extension: report_extension.into(),
            source_extension: source_extension.into(),
        }
    }

    /// `a/b.cli` -> `a/b.rpt`
    pub fn report_for(&self, source: &Path) -> PathBuf {
        source.with_extension(&self.report_extension)
    }

    /// `a/b.rpt` -> `a/b.cli`
    pub fn source_for(&self, report: &Path) -> PathBuf {
        report.with_extension(&self.source_extension)
    }

    pub fn is_report(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.report_extension.as_str()))
    }

    pub fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.source_extension.as_str()))
    }

    /// Read the report for `source`, `None` if it does not exist.
    ///
    /// Reports are not guaranteed to be UTF-8; invalid bytes are replaced.
    pub async fn load_report(&self, source: &Path) -> io::Result<Option<String>> {
        read_optional(&self.report_for(source)).await
    }

    /// Extract diagnostics for `source`, `None` if it has no report.
    pub async fn diagnostics_for(
        &self,
        source: &Path,
        policy: &AnchorPolicy,
    ) -> io::Result<Option<Vec<Diagnostic>>> {
        let Some(report) = self.load_report(source).await? else {
            return Ok(None);
        };
        let text = read_lossy(source).await?;
        Ok(Some(extract_with(&report, &text, policy)))
    }

    /// A report change marks a finished translation when the report is at
    /// least as new as its source.
    pub async fn translation_completed(&self, report: &Path) -> io::Result<bool> {
        let source = self.source_for(report);
        let report_mtime = tokio::fs::metadata(report).await?.modified()?;
        let source_mtime = tokio::fs::metadata(&source).await?.modified()?;
        Ok(report_mtime >= source_mtime)
    }
}

async fn read_lossy(path: &Path) -> io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match read_lossy(path).await {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let files = ReportFiles::default();
        assert_eq!(
            files.report_for(Path::new("/w/sources/a.cli")),
            PathBuf::from("/w/sources/a.rpt")
        );
        assert_eq!(
            files.source_for(Path::new("/w/sources/a.rpt")),
            PathBuf::from("/w/sources/a.cli")
        );
        assert!(files.is_report(Path::new("x.RPT")));
        assert!(files.is_source(Path::new("x.cli")));
        assert!(!files.is_source(Path::new("x.rpt")));
    }

    #[tokio::test]
    async fn test_missing_report_is_none() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.cli");
        fs::write(&source, "kleio$x\n").unwrap();

        let files = ReportFiles::default();
        assert!(files.load_report(&source).await.unwrap().is_none());
        assert!(
            files
                .diagnostics_for(&source, &AnchorPolicy::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_diagnostics_for_reads_both_files() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.cli");
        fs::write(&source, "kleio$x\n  fonte$y\n").unwrap();
        fs::write(dir.path().join("a.rpt"), "ERROR: bad line 2 \nok\n").unwrap();

        let files = ReportFiles::default();
        let diags = files
            .diagnostics_for(&source, &AnchorPolicy::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 2);
        assert_eq!(diags[0].column_start, 2);
    }

    #[tokio::test]
    async fn test_clean_report_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.cli");
        fs::write(&source, "kleio$x\n").unwrap();
        fs::write(dir.path().join("a.rpt"), "No errors found.\n").unwrap();

        let diags = ReportFiles::default()
            .diagnostics_for(&source, &AnchorPolicy::default())
            .await
            .unwrap();
        assert_eq!(diags, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_non_utf8_report() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.cli");
        fs::write(&source, "a\n").unwrap();
        fs::write(dir.path().join("a.rpt"), b"ERROR: Jo\xe3o line 1 \n").unwrap();

        let diags = ReportFiles::default()
            .diagnostics_for(&source, &AnchorPolicy::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(diags.len(), 1);
    }

    #[tokio::test]
    async fn test_translation_completed() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.cli");
        let report = dir.path().join("a.rpt");
        fs::write(&source, "a\n").unwrap();
        fs::write(&report, "").unwrap();

        let now = std::time::SystemTime::now();
        let earlier = now - std::time::Duration::from_secs(60);
        fs::File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(earlier)
            .unwrap();
        fs::File::options()
            .write(true)
            .open(&report)
            .unwrap()
            .set_modified(now)
            .unwrap();

        let files = ReportFiles::default();
        assert!(files.translation_completed(&report).await.unwrap());

        // Source edited after the report was written
        fs::File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(now + std::time::Duration::from_secs(60))
            .unwrap();
        assert!(!files.translation_completed(&report).await.unwrap());
    }
}
