//! Kleio home discovery.
//!
//! Server parameters can live next to the sources instead of in
//! `kleio.toml`. Lookup order, each walking up from the workspace root:
//!
//! | Marker       | Properties file                        | Keys                                                        |
//! |--------------|----------------------------------------|-------------------------------------------------------------|
//! | `.mhk-home`  | `system/conf/mhk_system.properties`    | `mhk.kleio.service.token.admin`, `mhk.kleio.service`, `mhk.home.dir` |
//! | `.mhk`       | `.mhk`                                 | same as above                                               |
//! | (none)       | `<workspace>/.kleio`                   | `kleio_token`, `kleio_url`, `kleio_home`                    |

use std::fs;
use std::path::{Path, PathBuf};

use super::util::{find_upward, property};

const MHK_HOME_MARKER: &str = ".mhk-home";
const MHK_FILE: &str = ".mhk";
const KLEIO_FILE: &str = ".kleio";
const SYSTEM_PROPERTIES: &str = "system/conf/mhk_system.properties";

/// Where the server parameters were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSource {
    MhkHome,
    MhkFile,
    KleioFile,
}

impl HomeSource {
    fn properties_path(self, home: &Path) -> PathBuf {
        match self {
            Self::MhkHome => home.join(SYSTEM_PROPERTIES),
            Self::MhkFile => home.join(MHK_FILE),
            Self::KleioFile => home.join(KLEIO_FILE),
        }
    }

    const fn token_key(self) -> &'static str {
        match self {
            Self::KleioFile => "kleio_token",
            _ => "mhk.kleio.service.token.admin",
        }
    }

    const fn url_key(self) -> &'static str {
        match self {
            Self::KleioFile => "kleio_url",
            _ => "mhk.kleio.service",
        }
    }

    const fn home_key(self) -> &'static str {
        match self {
            Self::KleioFile => "kleio_home",
            _ => "mhk.home.dir",
        }
    }
}

/// Server parameters read from a Kleio home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeProperties {
    pub source: HomeSource,
    /// Local directory mirrored by the server (the mhk home)
    pub home: PathBuf,
    pub token: Option<String>,
    pub url: Option<String>,
    /// The same directory as the server sees it
    pub kleio_home: Option<String>,
}

impl HomeProperties {
    /// Walk up from `workspace` looking for a Kleio home.
    ///
    /// Falls back to the workspace itself with its `.kleio` file; a missing
    /// file leaves every property unset.
    pub fn discover(workspace: &Path) -> Self {
        if let Some(home) = find_upward(workspace, MHK_HOME_MARKER) {
            return Self::load(HomeSource::MhkHome, home);
        }
        if let Some(home) = find_upward(workspace, MHK_FILE) {
            return Self::load(HomeSource::MhkFile, home);
        }
        Self::load(HomeSource::KleioFile, workspace.to_path_buf())
    }

    /// Read properties from an explicitly configured home directory.
    pub fn at(home: &Path) -> Self {
        let source = [HomeSource::MhkHome, HomeSource::MhkFile]
            .into_iter()
            .find(|source| source.properties_path(home).is_file())
            .unwrap_or(HomeSource::KleioFile);
        Self::load(source, home.to_path_buf())
    }

    fn load(source: HomeSource, home: PathBuf) -> Self {
        let path = source.properties_path(&home);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                crate::debug!("config"; "no properties at {}: {}", path.display(), err);
                String::new()
            }
        };

        let get = |key: &str| {
            property(&content, key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            token: get(source.token_key()),
            url: get(source.url_key()),
            kleio_home: get(source.home_key()),
            source,
            home,
        }
    }
}
