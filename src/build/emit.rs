//! Static sub-resources emitted while transforming entries.
//!
//! Stylesheets reference images and fonts through `url(...)`. Each referenced
//! file becomes its own artifact under `static/<category>/` with a hashed
//! name, and the reference is rewritten to the public path.

use std::collections::hash_map::Entry as Slot;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use parking_lot::Mutex;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::core::FileCategory;
use crate::transform::TransformContext;

use super::hash::content_hash;
use super::naming::NameTemplate;
use super::{Artifact, ArtifactKind};

/// Default pattern for binary sub-resources (query suffix allowed).
pub const DEFAULT_STATIC_TEST: &str =
    r"\.(svg|ico|jpg|jpeg|png|gif|eot|otf|webp|ttf|woff|woff2|cur|ani|pdf)(\?.*)?$";

/// How referenced binary assets are named and addressed.
#[derive(Debug, Clone)]
pub struct StaticRule {
    /// Which references count as static assets.
    pub test: Regex,
    /// Output directory relative to the assets directory.
    pub output: PathBuf,
    /// Prefix used in rewritten references. Relative, so the bundle still
    /// works when deployed under a sub-path.
    pub public_path: String,
    pub filename: NameTemplate,
}

impl StaticRule {
    pub fn matches(&self, reference: &str) -> bool {
        self.test.is_match(reference)
    }
}

#[cfg(test)]
impl Default for StaticRule {
    fn default() -> Self {
        Self {
            test: Regex::new(DEFAULT_STATIC_TEST).expect("default static pattern is valid"),
            output: PathBuf::from("static/img"),
            public_path: "../assets/static/img".into(),
            filename: "[name].[hash:8].[ext]"
                .parse()
                .expect("default static filename is valid"),
        }
    }
}

/// Collects static artifacts from concurrently running transform chains.
///
/// Identical content maps to the same output path, so a second emit of the
/// same file is a no-op. Different content landing on one path (two
/// `logo.svg` files under the `local` hash) is an error.
pub struct AssetEmitter {
    rule: StaticRule,
    /// Output path → (first source, artifact).
    emitted: Mutex<FxHashMap<PathBuf, (PathBuf, Artifact)>>,
}

impl AssetEmitter {
    pub fn new(rule: StaticRule) -> Self {
        Self {
            rule,
            emitted: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn rule(&self) -> &StaticRule {
        &self.rule
    }

    /// Emit `source` as a static artifact and return its public URL.
    ///
    /// The file runs through the asset transform chain before hashing.
    pub fn emit(&self, source: &Path, ctx: &TransformContext<'_>) -> Result<String> {
        let bytes = fs::read(source).with_context(|| format!("reading {}", source.display()))?;
        let asset_ctx = ctx.with_source(source);
        let bytes = ctx
            .registry
            .run(FileCategory::Asset, bytes, &asset_ctx)?;

        let hash = content_hash(ctx.mode, &bytes);
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("asset");
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        let file_name = self.rule.filename.render(stem, &hash, &hash, ext);
        let output_path = self.rule.output.join(&file_name);
        let url = format!("{}/{}", self.rule.public_path.trim_end_matches('/'), file_name);

        match self.emitted.lock().entry(output_path.clone()) {
            Slot::Occupied(slot) => {
                let (first, existing) = slot.get();
                if existing.contents != bytes {
                    bail!(
                        "{} and {} both map to {} with different contents",
                        first.display(),
                        source.display(),
                        output_path.display()
                    );
                }
            }
            Slot::Vacant(slot) => {
                slot.insert((
                    source.to_path_buf(),
                    Artifact {
                        logical_name: stem.to_string(),
                        output_path,
                        contents: bytes,
                        content_hash: hash,
                        kind: ArtifactKind::Static,
                    },
                ));
            }
        }

        crate::debug!("build"; "emitted {}", file_name);
        Ok(url)
    }

    /// Emitted artifacts sorted by output path.
    pub fn into_artifacts(self) -> Vec<Artifact> {
        let mut artifacts: Vec<_> = self
            .emitted
            .into_inner()
            .into_values()
            .map(|(_, artifact)| artifact)
            .collect();
        artifacts.sort_by(|a, b| a.output_path.cmp(&b.output_path));
        artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_matches_binary_assets() {
        let rule = StaticRule::default();
        assert!(rule.matches("../images/logo.svg"));
        assert!(rule.matches("fonts/icons.woff2?v=4.7.0"));
        assert!(rule.matches("favicon.ico"));
        assert!(!rule.matches("theme.css"));
        assert!(!rule.matches("app.js"));
    }

    #[test]
    fn test_default_rule_naming() {
        let rule = StaticRule::default();
        assert_eq!(
            rule.filename.render("logo", "0123456789abcdef", "0123456789abcdef", "png"),
            "logo.01234567.png"
        );
    }
}
