//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_from_root` - config paths (tilde expansion + root-relative)
//! - `to_slash` - forward-slash rendering for URLs and manifests

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a path taken from `forge.toml`.
///
/// Expands a leading `~`, then joins relative paths onto `root`.
/// Always returns an absolute path when `root` is absolute.
pub fn resolve_from_root(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full = if path.is_relative() {
        root.join(path)
    } else {
        path
    };
    normalize_path(&full)
}

/// Render a relative path with forward slashes.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_resolve_from_root_relative() {
        let resolved = resolve_from_root(Path::new("webapp/templates"), Path::new("/site"));
        assert_eq!(resolved, PathBuf::from("/site/webapp/templates"));
    }

    #[test]
    fn test_resolve_from_root_absolute() {
        let resolved = resolve_from_root(Path::new("/opt/templates"), Path::new("/site"));
        assert_eq!(resolved, PathBuf::from("/opt/templates"));
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("static/img/logo.png")), "static/img/logo.png");
    }
}
