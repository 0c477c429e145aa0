//! `manifest.json`: logical names to emitted output paths.
//!
//! ```json
//! {
//!   "mode": "production",
//!   "hash": "3f1c9a0b7d2e4f5a6b8c",
//!   "entries": { "app": "app.9e1f….js", "styles": "styles.04ab….css" },
//!   "static": ["static/img/logo.1a2b3c4d.svg"]
//! }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use super::{ArtifactKind, BuildResult};

#[derive(Serialize)]
struct Manifest<'a> {
    mode: &'static str,
    hash: &'a str,
    entries: Map<String, Value>,
    #[serde(rename = "static")]
    statics: Vec<String>,
    copied: Vec<String>,
}

/// Serialize `result` as pretty JSON, entries in declaration order.
pub fn render_manifest(result: &BuildResult) -> serde_json::Result<Vec<u8>> {
    let entries = result
        .entries()
        .map(|a| (a.logical_name.clone(), Value::String(a.output_slash())))
        .collect();
    let paths_of = |kind: ArtifactKind| -> Vec<String> {
        result
            .artifacts
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.output_slash())
            .collect()
    };

    let manifest = Manifest {
        mode: result.mode.name(),
        hash: &result.hash,
        entries,
        statics: paths_of(ArtifactKind::Static),
        copied: paths_of(ArtifactKind::Copied),
    };
    serde_json::to_vec_pretty(&manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Artifact;
    use crate::core::{BuildMode, FileCategory};
    use std::path::PathBuf;

    fn artifact(name: &str, path: &str, kind: ArtifactKind) -> Artifact {
        Artifact {
            logical_name: name.into(),
            output_path: PathBuf::from(path),
            contents: Vec::new(),
            content_hash: "local".into(),
            kind,
        }
    }

    #[test]
    fn test_manifest_keeps_entry_order() {
        let result = BuildResult {
            mode: BuildMode::Development,
            artifacts: vec![
                artifact("styles", "styles.local.css", ArtifactKind::Entry(FileCategory::Style)),
                artifact("app", "app.local.js", ArtifactKind::Entry(FileCategory::Script)),
                artifact("logo", "static/img/logo.local.svg", ArtifactKind::Static),
            ],
            hash: "local".into(),
        };

        let json: Value = serde_json::from_slice(&render_manifest(&result).unwrap()).unwrap();
        assert_eq!(json["mode"], "development");
        assert_eq!(json["hash"], "local");
        let keys: Vec<_> = json["entries"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["styles", "app"]);
        assert_eq!(json["entries"]["app"], "app.local.js");
        assert_eq!(json["static"][0], "static/img/logo.local.svg");
        assert!(json["copied"].as_array().unwrap().is_empty());
    }
}
