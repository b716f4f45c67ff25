//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// ```text
/// /home/user/mhk/sources/demo/  ← start
/// /home/user/mhk/kleio.toml     ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }
    find_upward(start, config_name).map(|dir| dir.join(config_name))
}

/// Nearest directory at or above `start` that contains `name`.
pub fn find_upward(start: &Path, name: impl AsRef<Path>) -> Option<PathBuf> {
    let name = name.as_ref();
    start
        .ancestors()
        .find(|dir| dir.join(name).exists())
        .map(Path::to_path_buf)
}

/// Value of `key` in a `key=value` properties text.
///
/// The first matching line wins; lines are split on `\n` or `\r\n`.
pub fn property<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        line.strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

/// Check that `url` is an absolute `http(s)` URL.
pub fn is_http_url(url: &str) -> bool {
    url::Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}

/// Expand `~` and make `path` absolute against `root`.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = PathBuf::from(shellexpand::tilde(&raw).as_ref());
    if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("sources/demo");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("kleio.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("kleio.toml")).unwrap();
        assert_eq!(found, dir.path().join("kleio.toml"));
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("custom.toml");
        assert!(find_config_file(dir.path(), &config).is_none());

        fs::write(&config, "").unwrap();
        assert_eq!(find_config_file(Path::new("/"), &config), Some(config));
    }

    #[test]
    fn test_find_upward_nearest_wins() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("a/b");
        fs::create_dir_all(&inner).unwrap();
        fs::write(dir.path().join(".mhk"), "").unwrap();
        fs::write(dir.path().join("a/.mhk"), "").unwrap();

        assert_eq!(find_upward(&inner, ".mhk"), Some(dir.path().join("a")));
        assert_eq!(find_upward(&inner, ".mhk-home"), None);
    }

    #[test]
    fn test_property() {
        let content = "# comment\r\nmhk.kleio.service=http://kleio:8088\r\nmhk.kleio.service.token.admin=abc=def\n";
        assert_eq!(property(content, "mhk.kleio.service"), Some("http://kleio:8088"));
        assert_eq!(property(content, "mhk.kleio.service.token.admin"), Some("abc=def"));
        assert_eq!(property(content, "mhk.home.dir"), None);
    }

    #[test]
    fn test_property_prefix_is_not_a_match() {
        // "kleio_url" must not match "kleio_url_backup=..."
        assert_eq!(property("kleio_url_backup=x\n", "kleio_url"), None);
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("http://localhost:8088"));
        assert!(is_http_url("https://kleio.example.org/"));
        assert!(!is_http_url("localhost:8088"));
        assert!(!is_http_url("ftp://example.org"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/work");
        assert_eq!(resolve_path(root, Path::new("mhk")), PathBuf::from("/work/mhk"));
        assert_eq!(resolve_path(root, Path::new("/abs")), PathBuf::from("/abs"));
    }
}
