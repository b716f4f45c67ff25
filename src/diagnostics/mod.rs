//! Diagnostics from Kleio translation reports.
//!
//! # Module Structure
//!
//! - `extract` - pure report → diagnostics conversion
//! - `report` - locating and reading `.rpt` files next to sources
//! - `store` - per-document diagnostic sets with generation sequencing

mod extract;
mod report;
mod store;

use std::fmt;

use serde::Serialize;

pub use extract::{AnchorPolicy, extract, extract_line_number, extract_with, split_lines};
pub use report::ReportFiles;
pub use store::{DiagnosticStore, Ticket};

/// Diagnostic severity, taken from the report entry prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Severity of a report entry, or `None` for non-diagnostic lines.
    pub fn from_entry(entry: &str) -> Option<Self> {
        if entry.starts_with("ERROR:") {
            Some(Self::Error)
        } else if entry.starts_with("WARNING:") {
            Some(Self::Warning)
        } else {
            None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A diagnostic anchored on one source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based line in the source document
    pub line: usize,
    /// Character offset of the first non-whitespace character
    pub column_start: usize,
    /// Character length of the line
    pub column_end: usize,
    /// Report entry, verbatim
    pub message: String,
}

impl Diagnostic {
    /// Zero-based `(line, start)..(line, end)` range for editor APIs.
    pub fn range(&self) -> ((usize, usize), (usize, usize)) {
        let line = self.line - 1;
        ((line, self.column_start), (line, self.column_end))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line,
            self.column_start + 1,
            self.severity.as_str(),
            self.message
        )
    }
}
