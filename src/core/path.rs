//! Path conventions shared by the status cache and the service client.
//!
//! The Kleio server speaks forward-slash, home-relative paths. Directory keys
//! stored in the cache are additionally stripped of leading and trailing
//! slashes so that `"/"`, `""` and `"a/"` compare the way a tree view expects:
//!
//! ```text
//! "/sources/demo/"  -> "sources/demo"
//! "sources\\demo"   -> "sources/demo"
//! "/"               -> ""            (root)
//! ```

use std::path::Path;

/// Replace Windows separators with `/`.
#[inline]
pub fn to_unix(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexically normalize a forward-slash path (`.` dropped, `..` folded).
///
/// A leading `/` is preserved; trailing slashes are not.
pub fn lexical_normalize(path: &str) -> String {
    let path = to_unix(path);
    let absolute = path.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for comp in path.split('/') {
        match comp {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Normalize a directory into a cache key (no leading/trailing `/`, root = `""`).
pub fn dir_key(dir: &str) -> String {
    let normalized = lexical_normalize(dir);
    let trimmed = normalized.trim_matches('/');
    if trimmed == "." {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Iterate a directory key and all of its ancestors, ending with the root.
///
/// ```text
/// "a/b/c" -> "a/b/c", "a/b", "a", ""
/// ""      -> ""
/// ```
pub fn ancestors(key: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(key);
    std::iter::from_fn(move || {
        let current = next?;
        next = if current.is_empty() {
            None
        } else {
            Some(current.rfind('/').map_or("", |i| &current[..i]))
        };
        Some(current)
    })
}

/// Convert a local path into the server's path convention.
///
/// The `mhk_home` prefix is swapped for `kleio_home` (the same tree as seen by
/// the server), separators become `/`, and the result is normalized.
pub fn service_path(path: &Path, mhk_home: &Path, kleio_home: &str) -> String {
    let local = to_unix(&path.to_string_lossy());
    let home = to_unix(&mhk_home.to_string_lossy());
    let home = home.trim_end_matches('/');

    let relative = match local.strip_prefix(home) {
        Some(rest) if !home.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
        _ => &local,
    };

    lexical_normalize(&format!("{}{}", to_unix(kleio_home), relative))
}

/// Whether `path` ends with `suffix`, comparing in forward-slash form.
///
/// An empty suffix never matches.
pub fn ends_with_path(path: &str, suffix: &str) -> bool {
    !suffix.is_empty() && to_unix(path).ends_with(&to_unix(suffix))
}
