//! Entry declarations and build outputs.

use std::path::{Path, PathBuf};

use crate::core::{BuildMode, FileCategory};
use crate::utils::path::to_slash;

/// A named top-level module that seeds one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Logical name, becomes `[name]` in the output file name.
    pub name: String,
    /// Specifier handed to the resolver (e.g. `./webapp/javascript/index.jsx`).
    pub source: String,
    /// Category declared by the specifier's suffix, if it has one.
    /// Suffix-less specifiers are classified after resolution.
    pub category: Option<FileCategory>,
}

impl Entry {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let category = FileCategory::from_path(Path::new(&source));
        Self {
            name: name.into(),
            source,
            category,
        }
    }
}

/// Where an artifact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Bundled entry (script or style).
    Entry(FileCategory),
    /// Binary sub-resource referenced from an entry.
    Static,
    /// File copied through verbatim by a `[[copy]]` pattern.
    Copied,
}

/// A produced output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub logical_name: String,
    /// Path relative to the assets directory.
    pub output_path: PathBuf,
    pub contents: Vec<u8>,
    /// Full content digest in production, `local` in development.
    pub content_hash: String,
    pub kind: ArtifactKind,
}

impl Artifact {
    /// Output path with forward slashes (for manifests and hashing).
    pub fn output_slash(&self) -> String {
        to_slash(&self.output_path)
    }

    pub fn is_entry(&self) -> bool {
        matches!(self.kind, ArtifactKind::Entry(_))
    }

    /// Stable key of the artifact within a run.
    ///
    /// Entries are keyed by category and name since their output path embeds
    /// the bundle hash; everything else by output path.
    pub fn identity(&self) -> String {
        match self.kind {
            ArtifactKind::Entry(category) => format!("{}:{}", category.name(), self.logical_name),
            ArtifactKind::Static | ArtifactKind::Copied => self.output_slash(),
        }
    }
}

/// Everything one successful build produced.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub mode: BuildMode,
    /// Entry artifacts in declaration order, then static and copied files.
    pub artifacts: Vec<Artifact>,
    /// Overall bundle hash handed to the page renderer.
    pub hash: String,
}

impl BuildResult {
    /// Artifact for the entry with the given logical name.
    #[cfg(test)]
    pub fn entry(&self, name: &str) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|a| a.is_entry() && a.logical_name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(|a| a.is_entry())
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.artifacts.iter().filter(|a| a.kind == kind).count()
    }
}
