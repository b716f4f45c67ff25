//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    #[error(
        "no Kleio admin token configured (set `[server] token` or add one under `{}`)",
        .0.display()
    )]
    MissingToken(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("kleio.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("kleio.toml"));

        let validation_err = ConfigError::Validation("bad url".to_string());
        assert!(format!("{validation_err}").contains("bad url"));

        let missing = ConfigError::MissingToken(PathBuf::from("/srv/mhk"));
        assert!(format!("{missing}").contains("/srv/mhk"));
    }
}
