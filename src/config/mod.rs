//! Configuration for `kleio.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [server], [diagnostics], [watch]
//! ├── types/         # ConfigError, global handle
//! ├── home.rs        # .mhk-home / .mhk / .kleio discovery
//! ├── util.rs        # upward search, properties, paths
//! └── mod.rs         # KleioConfig (this file)
//! ```
//!
//! The file is optional: without one, defaults apply and server parameters
//! come from the discovered Kleio home.

mod home;
pub mod section;
pub mod types;
mod util;

pub use home::{HomeProperties, HomeSource};
pub use section::{DEFAULT_SERVER_URL, DiagnosticsConfig, ServerConfig, WatchConfig};
pub use types::{ConfigError, cfg, init_config};

use util::{find_config_file, is_http_url, resolve_path};

use crate::{core::path::service_path, log};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_NAME: &str = "kleio.toml";

// ============================================================================
// root configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KleioConfig {
    /// Config file in use (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Workspace root: parent of the config file, or the working directory
    #[serde(skip)]
    pub root: PathBuf,

    /// Server parameters after home discovery (internal use only)
    #[serde(skip)]
    pub connection: Connection,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

/// Resolved Kleio server parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub url: String,
    pub rpc_path: String,
    pub token: Option<String>,
    /// Local directory mirrored by the server
    pub mhk_home: PathBuf,
    /// `mhk_home` as seen by the server
    pub kleio_home: String,
    pub source: Option<HomeSource>,
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            rpc_path: ServerConfig::default().path,
            token: None,
            mhk_home: PathBuf::new(),
            kleio_home: String::new(),
            source: None,
        }
    }
}

impl Connection {
    /// Local path in the server's convention.
    pub fn service_path(&self, path: &Path) -> String {
        service_path(path, &self.mhk_home, &self.kleio_home)
    }

    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingToken(self.mhk_home.clone()))
    }
}

impl KleioConfig {
    /// Load configuration, searching upward from `cwd` for `config_name`.
    pub fn load(config_name: &Path, cwd: &Path) -> Result<Self> {
        let mut config = match find_config_file(cwd, config_name) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.to_path_buf());
                config.config_path = Some(path);
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", config_name.display());
                Self {
                    root: cwd.to_path_buf(),
                    ..Self::default()
                }
            }
        };

        config.finalize();
        config.validate()?;

        if config.connection.token.is_none() {
            log!(
                "warning";
                "no Kleio admin token found: translation services will not be available"
            );
        }

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Resolve the server connection: config values first, then the
    /// discovered Kleio home, then defaults.
    fn finalize(&mut self) {
        let configured_home = self
            .server
            .home
            .as_deref()
            .map(|home| resolve_path(&self.root, home));

        let props = match &configured_home {
            Some(home) => HomeProperties::at(home),
            None => HomeProperties::discover(&self.root),
        };
        crate::debug!("config"; "kleio home: {} ({:?})", props.home.display(), props.source);

        self.connection = Connection {
            url: self
                .server
                .url
                .clone()
                .or(props.url)
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            rpc_path: self.server.path.clone(),
            token: self.server.token.clone().or(props.token),
            mhk_home: configured_home.unwrap_or(props.home),
            kleio_home: self
                .server
                .kleio_home
                .clone()
                .or(props.kleio_home)
                .unwrap_or_default(),
            source: Some(props.source),
        };
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.connection.url) {
            return Err(ConfigError::Validation(format!(
                "server url `{}` is not an http(s) URL",
                self.connection.url
            )));
        }
        let files = self.diagnostics.report_files();
        if files.report_extension.is_empty() || files.source_extension.is_empty() {
            return Err(ConfigError::Validation(
                "diagnostics extensions must not be empty".to_string(),
            ));
        }
        if files.report_extension == files.source_extension {
            return Err(ConfigError::Validation(format!(
                "report and source extension are both `{}`",
                files.report_extension
            )));
        }
        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "watch.debounce_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> KleioConfig {
    let (parsed, ignored) = KleioConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
