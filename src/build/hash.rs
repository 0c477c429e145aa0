//! Content hashing for artifact names and the bundle hash.
//!
//! Production uses blake3 digests of the transformed bytes. Development uses
//! the fixed `local` sentinel so output paths stay stable across rebuilds.

use crate::core::BuildMode;

use super::Artifact;

/// Hash used for every artifact in development.
pub const LOCAL_HASH: &str = "local";

/// Length of the overall bundle hash (hex chars).
pub const BUNDLE_HASH_LEN: usize = 20;

/// Full blake3 hex digest of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Content hash for an artifact under `mode`.
#[inline]
pub fn content_hash(mode: BuildMode, bytes: &[u8]) -> String {
    if mode.hashes_content() {
        digest(bytes)
    } else {
        LOCAL_HASH.to_string()
    }
}

/// Overall hash for a run.
///
/// Production: blake3 over the `(identity, content hash)` pairs of every
/// artifact, sorted by identity, so it depends on the full artifact set but
/// not on the order entries finished in. Entry output paths are not part of
/// the input; they are derived from the result.
pub fn bundle_hash(mode: BuildMode, artifacts: &[Artifact]) -> String {
    if !mode.hashes_content() {
        return LOCAL_HASH.to_string();
    }

    let mut pairs: Vec<(String, &str)> = artifacts
        .iter()
        .map(|a| (a.identity(), a.content_hash.as_str()))
        .collect();
    pairs.sort();

    let mut hasher = blake3::Hasher::new();
    for (path, hash) in &pairs {
        hasher.update(path.as_bytes());
        hasher.update(&[0]);
        hasher.update(hash.as_bytes());
        hasher.update(&[0]);
    }
    let hex = hex::encode(hasher.finalize().as_bytes());
    hex[..BUNDLE_HASH_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::ArtifactKind;
    use crate::core::FileCategory;
    use std::path::PathBuf;

    fn artifact(name: &str, bytes: &[u8]) -> Artifact {
        let hash = content_hash(BuildMode::Production, bytes);
        Artifact {
            logical_name: name.into(),
            output_path: PathBuf::new(),
            contents: bytes.to_vec(),
            content_hash: hash,
            kind: ArtifactKind::Entry(FileCategory::Script),
        }
    }

    #[test]
    fn test_content_hash_deterministic() {
        let a = content_hash(BuildMode::Production, b"console.log(1)");
        let b = content_hash(BuildMode::Production, b"console.log(1)");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_content_hash_changes_with_content() {
        let a = content_hash(BuildMode::Production, b"console.log(1)");
        let b = content_hash(BuildMode::Production, b"console.log(2)");
        assert_ne!(a, b);
    }

    #[test]
    fn test_development_is_sentinel() {
        assert_eq!(content_hash(BuildMode::Development, b"anything"), LOCAL_HASH);
        assert_eq!(content_hash(BuildMode::Development, b""), LOCAL_HASH);
        let set = [artifact("app", b"x")];
        assert_eq!(bundle_hash(BuildMode::Development, &set), LOCAL_HASH);
    }

    #[test]
    fn test_bundle_hash_order_independent() {
        let a = artifact("app", b"a");
        let b = artifact("styles", b"b");
        let h1 = bundle_hash(BuildMode::Production, &[a.clone(), b.clone()]);
        let h2 = bundle_hash(BuildMode::Production, &[b, a]);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), BUNDLE_HASH_LEN);
    }

    #[test]
    fn test_bundle_hash_tracks_any_artifact() {
        let h1 = bundle_hash(
            BuildMode::Production,
            &[artifact("app", b"a"), artifact("styles", b"b")],
        );
        let h2 = bundle_hash(
            BuildMode::Production,
            &[artifact("app", b"a"), artifact("styles", b"c")],
        );
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_bundle_hash_ignores_entry_output_path() {
        let a = artifact("app", b"a");
        let mut named = a.clone();
        named.output_path = PathBuf::from("app.0123456789abcdef0123.js");
        assert_eq!(
            bundle_hash(BuildMode::Production, &[a]),
            bundle_hash(BuildMode::Production, &[named])
        );
    }
}
