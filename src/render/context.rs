//! Values available to templates.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::BuildMode;

use super::RenderError;

/// Environment variable naming the metadata payload file.
pub const METADATA_ENV: &str = "EXTRA_METADATA";

/// Read-only inputs of one render pass, built once after the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub build_hash: String,
    pub mode: BuildMode,
    /// Injected verbatim. Callers are responsible for sanitizing it.
    pub extra_metadata: Option<Vec<u8>>,
}

impl RenderContext {
    pub fn new(build_hash: impl Into<String>, mode: BuildMode, extra_metadata: Option<Vec<u8>>) -> Self {
        Self {
            build_hash: build_hash.into(),
            mode,
            extra_metadata,
        }
    }

    /// Value of a recognized placeholder, `None` for unknown names.
    pub fn lookup(&self, name: &str) -> Option<&[u8]> {
        match name {
            "hash" | "webpack.hash" => Some(self.build_hash.as_bytes()),
            "mode" => Some(self.mode.name().as_bytes()),
            "extra_metadata" => Some(self.extra_metadata.as_deref().unwrap_or_default()),
            _ => None,
        }
    }
}

/// Metadata path from the CLI, falling back to `EXTRA_METADATA`.
/// An empty value counts as unset.
pub fn metadata_path(cli: Option<&Path>) -> Option<PathBuf> {
    cli.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(METADATA_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Read the metadata payload. A declared but unreadable file is fatal.
pub fn load_metadata(path: Option<&Path>) -> Result<Option<Vec<u8>>, RenderError> {
    let Some(path) = path else {
        return Ok(None);
    };
    fs::read(path)
        .map(Some)
        .map_err(|source| RenderError::MetadataUnavailable {
            path: path.to_path_buf(),
            source,
        })
}
