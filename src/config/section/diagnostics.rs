//! `[diagnostics]` section configuration.
//!
//! ```toml
//! [diagnostics]
//! report_extension = "rpt"    # translation report next to each source
//! source_extension = "cli"    # Kleio source files
//! line_offset = 0             # added to every reported line number
//! skip_blank_lines = true     # move anchors off blank lines
//! ```

use serde::{Deserialize, Serialize};

use crate::diagnostics::{AnchorPolicy, ReportFiles};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub report_extension: String,
    pub source_extension: String,
    pub line_offset: i64,
    pub skip_blank_lines: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        let files = ReportFiles::default();
        let policy = AnchorPolicy::default();
        Self {
            report_extension: files.report_extension,
            source_extension: files.source_extension,
            line_offset: policy.line_offset,
            skip_blank_lines: policy.skip_blank_lines,
        }
    }
}

impl DiagnosticsConfig {
    pub fn policy(&self) -> AnchorPolicy {
        AnchorPolicy {
            line_offset: self.line_offset,
            skip_blank_lines: self.skip_blank_lines,
        }
    }

    pub fn report_files(&self) -> ReportFiles {
        ReportFiles {
            report_extension: self.report_extension.trim_start_matches('.').to_string(),
            source_extension: self.source_extension.trim_start_matches('.').to_string(),
        }
    }
}
