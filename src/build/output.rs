//! Writing the artifact set to disk.

use std::fs;
use std::io;
use std::path::Path;

use super::{Artifact, BuildError};

/// Remove `dir` and everything in it, then recreate it empty.
pub fn clean_dir(dir: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(BuildError::io(dir, source)),
    }
    fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))
}

/// Write every artifact under `dir`, creating parent directories.
///
/// Identical output paths always carry identical bytes, so the order of
/// writes does not matter.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<(), BuildError> {
    for artifact in artifacts {
        let path = dir.join(&artifact.output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::write(&path, &artifact.contents).map_err(|e| BuildError::io(&path, e))?;
    }
    Ok(())
}
