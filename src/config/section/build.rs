//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! root = "webapp/public"            # Pages are written here
//! assets = "assets"                 # Artifact directory under `root`, cleared every run
//! filename = "[name].[hash].[ext]"  # Entry artifact naming
//! jobs = 0                          # Parallel transforms, 0 = one per CPU
//! minify = true                     # Minify scripts and styles in production
//! manifest = "manifest.json"        # Optional, written inside `assets`
//! ```

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

use crate::build::NameTemplate;
use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Output root (absolute after loading).
    pub root: PathBuf,
    /// Assets directory, relative to `root`.
    pub assets: PathBuf,
    pub filename: String,
    pub jobs: usize,
    pub minify: bool,
    pub manifest: Option<String>,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            root: "public".into(),
            assets: "assets".into(),
            filename: "[name].[hash].[ext]".into(),
            jobs: 0,
            minify: true,
            manifest: None,
        }
    }
}

pub struct BuildFields {
    pub assets: FieldPath,
    pub filename: FieldPath,
    pub manifest: FieldPath,
}

impl BuildSectionConfig {
    pub const FIELDS: BuildFields = BuildFields {
        assets: FieldPath::new("build.assets"),
        filename: FieldPath::new("build.filename"),
        manifest: FieldPath::new("build.manifest"),
    };

    /// Absolute assets directory.
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(&self.assets)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        // The assets directory is removed recursively on every run
        if !is_plain_relative(&self.assets) {
            diag.error_with_hint(
                Self::FIELDS.assets,
                format!("`{}` must be a non-empty relative path", self.assets.display()),
                "use a subdirectory such as \"assets\"",
            );
        }

        if let Err(e) = self.filename.parse::<NameTemplate>() {
            diag.error(Self::FIELDS.filename, e);
        }

        if let Some(manifest) = &self.manifest
            && (manifest.is_empty() || manifest.contains(['/', '\\']))
        {
            diag.error(
                Self::FIELDS.manifest,
                format!("`{manifest}` must be a plain file name"),
            );
        }
    }
}

/// Relative, non-empty, and without `..` or root components.
pub(crate) fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}
