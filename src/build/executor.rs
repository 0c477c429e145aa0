//! Build executor: entries in, content-addressed artifacts out.
//!
//! ```text
//! clean assets/ ─► resolve + transform entries (parallel) ─► statics, copies
//!              ─► bundle hash ─► name entries ─► write assets/ (+ manifest)
//! ```
//!
//! Entry file names embed the bundle hash (`[hash]`), so every entry of a run
//! shares the hash the page renderer injects. Each artifact still carries its
//! own content hash, available to names through `[contenthash]`.
//!
//! Everything is computed in memory before the first write, and the assets
//! directory is cleared up front, so a failed run never leaves a mix of old
//! and new files behind.

use std::fs;
use std::io;
use std::path::PathBuf;

use rayon::prelude::*;
use thiserror::Error;

use crate::core::{BuildMode, FileCategory};
use crate::logger::ProgressLine;
use crate::resolve::{PathResolver, ResolutionError};
use crate::transform::{TransformContext, TransformError, TransformRegistry};

use super::copy::{CopyPattern, collect_copies};
use super::emit::{AssetEmitter, StaticRule};
use super::hash::{bundle_hash, content_hash};
use super::manifest::render_manifest;
use super::naming::NameTemplate;
use super::output::{clean_dir, write_artifacts};
use super::{Artifact, ArtifactKind, BuildResult, Entry};

/// A build run failed. Nothing from the run is left in the assets directory.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("entry `{entry}`: cannot resolve its source")]
    ResolutionFailed {
        entry: String,
        #[source]
        source: ResolutionError,
    },

    #[error("entry `{entry}`: stage `{stage}` failed on {}", file.display())]
    TransformFailed {
        entry: String,
        /// Stage that rejected its input (an asset stage for emitted files).
        stage: String,
        file: PathBuf,
        #[source]
        source: TransformError,
    },

    #[error("entry `{entry}`: {} is neither a script nor a stylesheet", path.display())]
    Unclassified { entry: String, path: PathBuf },

    #[error("I/O failure at {}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start build workers")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// Entry the failure is attributed to, if any.
    pub fn entry(&self) -> Option<&str> {
        match self {
            Self::ResolutionFailed { entry, .. }
            | Self::TransformFailed { entry, .. }
            | Self::Unclassified { entry, .. } => Some(entry),
            Self::IoFailure { .. } | Self::WorkerPool(_) => None,
        }
    }
}

/// Static settings of the executor.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Absolute assets directory, owned exclusively by the run.
    pub assets_dir: PathBuf,
    pub filename: NameTemplate,
    /// Worker bound, 0 = one per CPU.
    pub jobs: usize,
    pub statics: StaticRule,
    pub copies: Vec<CopyPattern>,
    /// Manifest file name inside the assets directory.
    pub manifest: Option<String>,
}

impl BuildOptions {
    #[cfg(test)]
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            filename: NameTemplate::default(),
            jobs: 0,
            statics: StaticRule::default(),
            copies: Vec::new(),
            manifest: None,
        }
    }
}

pub struct Builder<'a> {
    mode: BuildMode,
    options: &'a BuildOptions,
    resolver: &'a PathResolver,
    registry: &'a TransformRegistry,
    progress: Option<&'a ProgressLine>,
}

impl<'a> Builder<'a> {
    pub fn new(
        mode: BuildMode,
        options: &'a BuildOptions,
        resolver: &'a PathResolver,
        registry: &'a TransformRegistry,
    ) -> Self {
        Self {
            mode,
            options,
            resolver,
            registry,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Option<&'a ProgressLine>) -> Self {
        self.progress = progress;
        self
    }

    /// Run the build for `entries`.
    ///
    /// Entries transform in parallel. If several fail, the error of the
    /// first failing entry in declaration order is returned.
    pub fn build(&self, entries: &[Entry]) -> Result<BuildResult, BuildError> {
        let assets_dir = &self.options.assets_dir;
        clean_dir(assets_dir)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .build()?;

        let emitter = AssetEmitter::new(self.options.statics.clone());
        let outcomes: Vec<_> = pool.install(|| {
            entries
                .par_iter()
                .map(|entry| self.build_entry(entry, &emitter))
                .collect()
        });

        let mut artifacts = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;
        artifacts.extend(emitter.into_artifacts());
        artifacts.extend(collect_copies(&self.options.copies, self.mode)?);

        let hash = bundle_hash(self.mode, &artifacts);
        for artifact in &mut artifacts {
            if let ArtifactKind::Entry(category) = artifact.kind {
                let ext = category.output_extension().unwrap_or_default();
                let file_name = self.options.filename.render(
                    &artifact.logical_name,
                    &hash,
                    &artifact.content_hash,
                    ext,
                );
                artifact.output_path = PathBuf::from(file_name);
            }
        }

        let result = BuildResult {
            mode: self.mode,
            hash,
            artifacts,
        };

        if let Err(e) = self.write(&result) {
            // Leave an empty assets directory rather than a partial bundle
            let _ = clean_dir(assets_dir);
            return Err(e);
        }

        crate::debug!(
            "build";
            "{} entries, {} static, {} copied, hash {}",
            result.entries().count(),
            result.count(ArtifactKind::Static),
            result.count(ArtifactKind::Copied),
            result.hash
        );
        Ok(result)
    }

    /// Resolve and transform one entry. The output path is assigned once the
    /// bundle hash is known.
    fn build_entry(&self, entry: &Entry, emitter: &AssetEmitter) -> Result<Artifact, BuildError> {
        let source = self
            .resolver
            .resolve(&entry.source)
            .map_err(|source| BuildError::ResolutionFailed {
                entry: entry.name.clone(),
                source,
            })?;

        let category = entry
            .category
            .or_else(|| FileCategory::from_path(&source))
            .filter(|c| c.output_extension().is_some())
            .ok_or_else(|| BuildError::Unclassified {
                entry: entry.name.clone(),
                path: source.clone(),
            })?;

        let bytes = fs::read(&source).map_err(|e| BuildError::io(&source, e))?;
        let ctx = TransformContext {
            mode: self.mode,
            entry: &entry.name,
            source: &source,
            resolver: self.resolver,
            registry: self.registry,
            emitter,
        };
        let contents = self
            .registry
            .run(category, bytes, &ctx)
            .map_err(|source| {
                let failed = source.innermost();
                BuildError::TransformFailed {
                    entry: entry.name.clone(),
                    stage: failed.stage.clone(),
                    file: failed.file.clone(),
                    source,
                }
            })?;

        let content_hash = content_hash(self.mode, &contents);

        if let Some(progress) = self.progress {
            progress.inc(category.name());
        }

        Ok(Artifact {
            logical_name: entry.name.clone(),
            output_path: PathBuf::new(),
            contents,
            content_hash,
            kind: ArtifactKind::Entry(category),
        })
    }

    fn write(&self, result: &BuildResult) -> Result<(), BuildError> {
        let assets_dir = &self.options.assets_dir;
        write_artifacts(assets_dir, &result.artifacts)?;

        if let Some(name) = &self.options.manifest {
            let path = assets_dir.join(name);
            let json = render_manifest(result).map_err(|e| BuildError::io(&path, e.into()))?;
            fs::write(&path, json).map_err(|e| BuildError::io(&path, e))?;
        }
        Ok(())
    }
}

/// Files currently in `dir`, relative and slash-separated (test helper).
#[cfg(test)]
pub(crate) fn list_relative(dir: &std::path::Path) -> Vec<String> {
    let mut files: Vec<_> = jwalk::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let path = e.path();
            crate::utils::path::to_slash(path.strip_prefix(dir).unwrap_or(&path))
        })
        .collect();
    files.sort();
    files
}
