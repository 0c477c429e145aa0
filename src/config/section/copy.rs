//! `[[copy]]` copy-through patterns.
//!
//! ```toml
//! [[copy]]
//! from = "webapp/images"   # Directory under the project root
//! to = "images"            # Destination under the assets directory
//! ```

use serde::Deserialize;
use std::path::PathBuf;

use crate::build::CopyPattern;
use crate::config::{ConfigDiagnostics, FieldPath};

use super::build::is_plain_relative;

#[derive(Debug, Clone, Deserialize)]
pub struct CopyConfig {
    /// Source directory (absolute after loading).
    pub from: PathBuf,
    /// Destination relative to the assets directory.
    #[serde(default)]
    pub to: PathBuf,
}

pub struct CopyFields {
    pub from: FieldPath,
    pub to: FieldPath,
}

impl CopyConfig {
    pub const FIELDS: CopyFields = CopyFields {
        from: FieldPath::new("copy.from"),
        to: FieldPath::new("copy.to"),
    };

    pub fn validate(&self, idx: usize, diag: &mut ConfigDiagnostics) {
        if !self.from.is_dir() {
            diag.error(
                Self::FIELDS.from,
                format!("[{idx}] directory not found: {}", self.from.display()),
            );
        }
        if !self.to.as_os_str().is_empty() && !is_plain_relative(&self.to) {
            diag.error(
                Self::FIELDS.to,
                format!("[{idx}] `{}` must stay inside the assets directory", self.to.display()),
            );
        }
    }

    pub fn to_pattern(&self) -> CopyPattern {
        CopyPattern {
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }
}
