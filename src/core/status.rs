//! Translation status codes reported by the Kleio server.
//!
//! | Code | Meaning            |
//! |------|--------------------|
//! | `E`  | With errors        |
//! | `V`  | Ready for import   |
//! | `W`  | With warnings      |
//! | `T`  | Needs translation  |
//! | `P`  | Translating        |
//! | `I`  | Needs import       |
//! | `Q`  | Queued             |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Translation state of a single source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusCode {
    #[serde(rename = "E")]
    Errors,
    #[serde(rename = "V")]
    ReadyForImport,
    #[serde(rename = "W")]
    Warnings,
    #[serde(rename = "T")]
    NeedsTranslation,
    #[serde(rename = "P")]
    Translating,
    #[serde(rename = "I")]
    NeedsImport,
    #[serde(rename = "Q")]
    Queued,
}

impl StatusCode {
    pub const ALL: [Self; 7] = [
        Self::Errors,
        Self::ReadyForImport,
        Self::Warnings,
        Self::NeedsTranslation,
        Self::Translating,
        Self::NeedsImport,
        Self::Queued,
    ];

    /// Single-letter wire code.
    pub const fn code(self) -> char {
        match self {
            Self::Errors => 'E',
            Self::ReadyForImport => 'V',
            Self::Warnings => 'W',
            Self::NeedsTranslation => 'T',
            Self::Translating => 'P',
            Self::NeedsImport => 'I',
            Self::Queued => 'Q',
        }
    }

    /// Label shown next to files in tree views.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Errors => "With errors",
            Self::ReadyForImport => "Ready for import",
            Self::Warnings => "With warnings",
            Self::NeedsTranslation => "Needs translation",
            Self::Translating => "Translating",
            Self::NeedsImport => "Needs import",
            Self::Queued => "Queued",
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == c.to_ascii_uppercase())
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status code `{0}` (expected one of E, V, W, T, P, I, Q)")]
pub struct UnknownStatus(pub String);

impl FromStr for StatusCode {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_code(c).ok_or_else(|| UnknownStatus(s.to_string())),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}
