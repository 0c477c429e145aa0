//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find the config file by searching upward from the current directory.
///
/// ```text
/// /home/user/site/webapp/javascript/  ← cwd
/// /home/user/site/forge.toml          ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(config_name, &cwd)
}

/// Same as [`find_config_file`], starting at `start`.
pub fn find_config_file_from(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("webapp/javascript");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("forge.toml"), "").unwrap();

        let found = find_config_file_from(Path::new("forge.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("forge.toml"));
    }

    #[test]
    fn test_absolute_config_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file_from(&path, dir.path()), None);
        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file_from(&path, Path::new("/")), Some(path));
    }
}
