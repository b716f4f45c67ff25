//! A single file's translation status as last reported by the server.

use serde::{Deserialize, Serialize};

use crate::core::StatusCode;

/// Status record as returned by `translations_get`.
///
/// Extra fields sent by the server (dates, error counts, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Identity key: canonical, service-relative path of the source file
    pub source_url: String,
    /// Containing directory, service-relative
    pub directory: String,
    /// Suffix matched against local document paths
    pub path: String,
    pub status: StatusCode,
}

impl StatusRecord {
    pub fn new(
        source_url: impl Into<String>,
        directory: impl Into<String>,
        path: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            directory: directory.into(),
            path: path.into(),
            status,
        }
    }

    /// Whether this record describes the document at `file_path`.
    pub fn matches(&self, file_path: &str) -> bool {
        crate::core::path::ends_with_path(file_path, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let json = r#"{
            "source_url": "/rest/sources/demo/a.cli",
            "directory": "sources/demo",
            "path": "sources/demo/a.cli",
            "status": "E",
            "errors": 3,
            "translated": "2021-03-01 10:00:00"
        }"#;
        let record: StatusRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, StatusCode::Errors);
        assert_eq!(record.directory, "sources/demo");
    }

    #[test]
    fn test_matches_suffix() {
        let record = StatusRecord::new("u", "sources", "sources/a.cli", StatusCode::Queued);
        assert!(record.matches("/home/me/mhk/sources/a.cli"));
        assert!(!record.matches("/home/me/mhk/sources/b.cli"));
    }
}
