//! Transform chains (loaders) per file category.
//!
//! A chain is an explicitly ordered list of stages. Each stage receives the
//! previous stage's output bytes; the first stage sees the raw file.
//!
//! ```text
//! script: command(esbuild, 10) → define(900) → minify-js(1000)
//! style:  command(sass, 10)    → asset-urls(900) → minify-css(1000)
//! asset:  command(svgo, 10)
//! ```

pub mod builtin;
mod registry;
mod stage;

pub use registry::{RegistryError, TransformRegistry};
pub use stage::{Transform, TransformError, TransformStage};

use std::path::Path;

use crate::build::AssetEmitter;
use crate::core::BuildMode;
use crate::resolve::PathResolver;

/// Read-only context handed to every stage invocation.
#[derive(Clone, Copy)]
pub struct TransformContext<'a> {
    pub mode: BuildMode,
    /// Logical name of the entry being built.
    pub entry: &'a str,
    /// File the bytes came from.
    pub source: &'a Path,
    pub resolver: &'a PathResolver,
    pub registry: &'a TransformRegistry,
    /// Sink for static sub-resources referenced by the file.
    pub emitter: &'a AssetEmitter,
}

impl<'a> TransformContext<'a> {
    /// Same context for a different file (sub-resources of the same entry).
    pub fn with_source(&self, source: &'a Path) -> Self {
        Self { source, ..*self }
    }

    /// Directory of the current file, base for relative references.
    pub fn source_dir(&self) -> &'a Path {
        self.source.parent().unwrap_or(self.resolver.root())
    }
}
