//! `[resolve]` section configuration.
//!
//! ```toml
//! [resolve]
//! extensions = [".ts", ".tsx", ".es6", ".js", ".jsx", ".json", ".svg"]
//! modules = ["node_modules", "webapp"]   # Searched in order for bare specifiers
//!
//! [resolve.alias]
//! "@utils" = "webapp/javascript/util"
//! ```

use serde::Deserialize;
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath, OrderedTable};
use crate::resolve::{DEFAULT_EXTENSIONS, PathResolver};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    pub extensions: Vec<String>,
    /// Search paths (absolute after loading).
    pub modules: Vec<PathBuf>,
    /// Alias key → target (absolute after loading).
    pub alias: OrderedTable<PathBuf>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            modules: vec!["node_modules".into()],
            alias: OrderedTable::default(),
        }
    }
}

pub struct ResolveFields {
    pub extensions: FieldPath,
    pub alias: FieldPath,
}

impl ResolveConfig {
    pub const FIELDS: ResolveFields = ResolveFields {
        extensions: FieldPath::new("resolve.extensions"),
        alias: FieldPath::new("resolve.alias"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|e| e.trim_start_matches('.').is_empty())
        {
            diag.error(
                Self::FIELDS.extensions,
                format!("invalid extension `{ext}`"),
            );
        }
        for (key, target) in self.alias.iter() {
            if key.is_empty() {
                diag.error(Self::FIELDS.alias, "alias keys must not be empty");
            } else if !target.exists() {
                diag.warn(
                    Self::FIELDS.alias,
                    format!("`{key}` points at missing {}", target.display()),
                );
            }
        }
    }

    /// Resolver rooted at `root` with this section's settings.
    pub fn resolver(&self, root: &std::path::Path) -> PathResolver {
        let resolver = PathResolver::new(root)
            .with_extensions(&self.extensions)
            .with_modules(&self.modules);
        self.alias
            .iter()
            .fold(resolver, |r, (key, target)| r.with_alias(key, target))
    }
}
