//! Copy-through patterns: files copied verbatim into the assets directory.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::core::BuildMode;

use super::hash::content_hash;
use super::{Artifact, ArtifactKind, BuildError};

/// `from` (absolute directory) is mirrored to `to` (relative to the assets directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPattern {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Collect the files of every pattern as artifacts, sorted per pattern.
pub fn collect_copies(patterns: &[CopyPattern], mode: BuildMode) -> Result<Vec<Artifact>, BuildError> {
    let mut artifacts = Vec::new();
    for pattern in patterns {
        for file in list_files(&pattern.from)? {
            let rel = file.strip_prefix(&pattern.from).unwrap_or(&file);
            let contents = fs::read(&file).map_err(|e| BuildError::io(&file, e))?;
            artifacts.push(Artifact {
                logical_name: crate::utils::path::to_slash(rel),
                output_path: pattern.to.join(rel),
                content_hash: content_hash(mode, &contents),
                contents,
                kind: ArtifactKind::Copied,
            });
        }
    }
    Ok(artifacts)
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !dir.is_dir() {
        return Err(BuildError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "copy source is not a directory"),
        ));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let mut entry = entry.map_err(|e| BuildError::io(dir, e.into()))?;
        // A directory that could not be listed still yields its own entry
        if let Some(e) = entry.read_children_error.take() {
            return Err(BuildError::io(entry.path(), e.into()));
        }
        if entry.file_type().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
