//! Kleio server error types.

use thiserror::Error;

/// Coarse classification used to pick the user-facing placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No response at all (connection refused, DNS, timeout)
    Unavailable,
    /// The server answered but signalled failure
    Remote,
}

/// Errors raised while talking to the Kleio server.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("connection refused by Kleio server: {0}")]
    Unavailable(String),

    #[error("Kleio server error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("unexpected response from Kleio server: {0}")]
    Protocol(String),
}

impl ServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Unavailable(_) => FailureKind::Unavailable,
            Self::Remote { .. } | Self::Protocol(_) => FailureKind::Remote,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unavailable(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Protocol(format!("HTTP {status}"))
        } else if err.is_decode() {
            Self::Protocol(err.to_string())
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}
