//! `[templates]` section configuration.
//!
//! ```toml
//! [templates]
//! dir = "webapp/templates"        # Every *.html here becomes a page
//! standalone = "standalone.html"  # Excluded from the per-template pages
//! ```

use serde::Deserialize;
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Template directory (absolute after loading).
    pub dir: PathBuf,
    pub standalone: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: "templates".into(),
            standalone: "standalone.html".into(),
        }
    }
}

pub struct TemplatesFields {
    pub dir: FieldPath,
}

impl TemplatesConfig {
    pub const FIELDS: TemplatesFields = TemplatesFields {
        dir: FieldPath::new("templates.dir"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.dir.is_dir() {
            diag.error_with_hint(
                Self::FIELDS.dir,
                format!("template directory not found: {}", self.dir.display()),
                "create it or point `templates.dir` at your page templates",
            );
        }
    }
}
