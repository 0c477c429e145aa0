//! `assetforge resolve`: show where specifiers land.

use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::{config::ForgeConfig, log, utils::plural_count};

/// Resolve every specifier and report the result.
///
/// Unresolvable specifiers list the candidates that were tried; the command
/// fails if any of them did not resolve.
pub fn resolve_specifiers(config: &ForgeConfig, specifiers: &[String]) -> Result<Vec<PathBuf>> {
    let resolver = config.resolver();
    let root = config.get_root();
    let mut resolved = Vec::with_capacity(specifiers.len());
    let mut failed = 0;

    for specifier in specifiers {
        match resolver.resolve(specifier) {
            Ok(path) => {
                let shown = path.strip_prefix(root).unwrap_or(&path);
                log!("resolve"; "{specifier} → {}", shown.display());
                resolved.push(path);
            }
            Err(e) => {
                failed += 1;
                log!("error"; "{e}");
                for tried in e.tried() {
                    log!("resolve"; "  tried {}", tried.display());
                }
            }
        }
    }

    if failed > 0 {
        bail!("{} could not be resolved", plural_count(failed, "specifier"));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_specifiers() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("webapp/javascript")).unwrap();
        fs::create_dir_all(root.join("node_modules/normalize.css")).unwrap();
        fs::write(root.join("webapp/javascript/index.jsx"), "").unwrap();
        fs::write(root.join("node_modules/normalize.css/normalize.css"), "").unwrap();

        let config = test_parse_config("", root);
        let paths = resolve_specifiers(
            &config,
            &[
                "./webapp/javascript/index".to_string(),
                "normalize.css/normalize.css".to_string(),
            ],
        )
        .unwrap();
        assert_eq!(
            paths,
            [
                root.join("webapp/javascript/index.jsx"),
                root.join("node_modules/normalize.css/normalize.css"),
            ]
        );
    }

    #[test]
    fn test_unresolved_specifier_fails() {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config("", dir.path());
        let err = resolve_specifiers(&config, &["./missing".to_string()]).unwrap_err();
        assert!(err.to_string().contains("1 specifier"));
    }
}
