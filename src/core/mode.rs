//! Build mode for production/development runs.
//!
//! The mode is decided once in `main` and passed by value from there on.
//! Nothing reads the environment after startup.

use std::fmt;
use std::str::FromStr;

/// Environment flag that selects the mode (`production` → Production).
pub const MODE_ENV: &str = "NODE_ENV";

/// Run-wide build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildMode {
    /// Stable `local` hashes, no minification.
    #[default]
    Development,
    /// Real content digests, minified output.
    Production,
}

impl BuildMode {
    /// Read the mode from `NODE_ENV`.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(MODE_ENV).ok().as_deref())
    }

    /// Map a raw `NODE_ENV` value to a mode. Only `production` selects Production.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }

    /// Name injected into templates and command stages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Whether artifact hashes are real content digests.
    #[inline]
    pub const fn hashes_content(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Whether minification stages are registered.
    #[inline]
    pub const fn minifies(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!(
                "unknown mode `{other}` (expected production or development)"
            )),
        }
    }
}
