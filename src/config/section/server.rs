//! `[server]` section configuration.
//!
//! ```toml
//! [server]
//! url = "http://localhost:8088"   # Kleio server
//! path = "/json/"                 # JSON-RPC endpoint path
//! token = "..."                   # admin token
//! home = "~/mhk-home"             # local tree mirrored by the server
//! kleio_home = "/kleio-home"      # the same tree as the server sees it
//! ```
//!
//! Unset fields are filled from the discovered Kleio home (see `config::home`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8088";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub path: String,
    pub token: Option<String>,
    pub home: Option<PathBuf>,
    pub kleio_home: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            path: "/json/".to_string(),
            token: None,
            home: None,
            kleio_home: None,
        }
    }
}
