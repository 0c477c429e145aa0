//! File category definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Category of a source file, selects the transform chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Script module (.js, .jsx, .ts, ...) - bundled to `.js`
    Script,
    /// Stylesheet (.css, .scss, ...) - bundled to `.css`
    Style,
    /// Binary asset (images, fonts) - copied through with a hashed name
    Asset,
}

impl FileCategory {
    pub const ALL: [Self; 3] = [Self::Script, Self::Style, Self::Asset];

    /// Detect category from file extension (without the dot).
    ///
    /// Only scripts and styles are recognized here; binary assets are
    /// matched by the configurable static rule instead.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "es6" => Some(Self::Script),
            "css" | "scss" | "sass" | "less" => Some(Self::Style),
            _ => None,
        }
    }

    /// Detect category from file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Extension of the bundled output for this category.
    ///
    /// Assets keep their own extension, so `None`.
    pub fn output_extension(self) -> Option<&'static str> {
        match self {
            Self::Script => Some("js"),
            Self::Style => Some("css"),
            Self::Asset => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
            Self::Asset => "asset",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
