//! Bundle building orchestration.
//!
//! Run phases:
//! - **Inputs** - Read the metadata payload and page templates
//! - **Build** - Resolve, transform and hash every entry, write `assets/`
//! - **Render** - Inject the bundle hash into every page template
//!
//! Inputs are read before anything is touched, so an unreadable metadata
//! file or template fails the run with zero artifacts. A failure after the
//! build clears the assets directory again.

use crate::{
    build::{BuildResult, Builder, Entry, clean_dir},
    config::ForgeConfig,
    core::{BuildMode, FileCategory},
    log,
    logger::ProgressLine,
    render::{RenderContext, RenderedPage, load_metadata, load_templates, metadata_path},
    utils::plural_count,
};
use anyhow::{Context, Result};
use std::path::Path;

use super::BuildArgs;

/// What one successful run produced.
#[derive(Debug)]
pub struct BuildOutcome {
    pub result: BuildResult,
    pub pages: Vec<RenderedPage>,
}

/// `assetforge build`
pub fn build_bundle(config: &ForgeConfig, mode: BuildMode, args: &BuildArgs) -> Result<BuildOutcome> {
    let metadata = metadata_path(args.metadata.as_deref());
    let outcome = run(config, mode, metadata.as_deref(), args.quiet)?;

    if !args.quiet {
        log!(
            "build";
            "{} ({}) in {}, hash {}",
            plural_count(outcome.result.artifacts.len(), "artifact"),
            mode,
            config.assets_dir().display(),
            outcome.result.hash
        );
        log!("render"; "{}", plural_count(outcome.pages.len(), "page"));
    }
    Ok(outcome)
}

/// Build then render.
pub fn run(
    config: &ForgeConfig,
    mode: BuildMode,
    metadata: Option<&Path>,
    quiet: bool,
) -> Result<BuildOutcome> {
    // Inputs
    let extra_metadata = load_metadata(metadata)?;
    let templates = load_templates(&config.templates.dir)?;
    let entries = config.entries();
    let registry = config.transform_registry(mode)?;
    let resolver = config.resolver();
    let options = config.build_options()?;

    for (category, stages) in registry.describe() {
        crate::debug!("transform"; "{}: {}", category, stages.join(" → "));
    }

    // Build
    let progress = create_progress(&entries, quiet);
    let result = Builder::new(mode, &options, &resolver, &registry)
        .with_progress(progress.as_ref())
        .build(&entries);
    if let Some(p) = progress {
        p.finish();
    }
    let result = result.context("build failed")?;

    // Render
    let renderer = config.renderer();
    let ctx = RenderContext::new(result.hash.clone(), mode, extra_metadata);
    let pages = renderer.render(&templates, &ctx);
    if let Err(e) = renderer.write(&pages) {
        let _ = clean_dir(&options.assets_dir);
        return Err(e).context("rendering pages failed");
    }

    Ok(BuildOutcome { result, pages })
}

/// Per-category entry counters, unless quiet.
fn create_progress(entries: &[Entry], quiet: bool) -> Option<ProgressLine> {
    if quiet {
        return None;
    }
    let count = |category: FileCategory| {
        entries
            .iter()
            .filter(|e| e.category == Some(category))
            .count()
    };
    Some(ProgressLine::new(&[
        ("script", count(FileCategory::Script)),
        ("style", count(FileCategory::Style)),
    ]))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildError, list_relative};
    use crate::config::test_parse_config;
    use crate::resolve::ResolutionError;
    use std::fs;
    use tempfile::TempDir;

    const INDEX_HTML: &str = r#"<html><head><%= extra_metadata %><link rel="stylesheet" href="assets/styles.<%= webpack.hash %>.css"></head><body data-mode="<%= mode %>"><script src="assets/app.<%= webpack.hash %>.js"></script></body></html>"#;

    struct Project {
        dir: TempDir,
    }

    impl Project {
        /// The two-entry project: `app` (jsx) and `styles` (scss) with an image.
        fn new(extra_config: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let root = dir.path();
            for sub in ["webapp/javascript", "webapp/sass", "webapp/images", "webapp/templates"] {
                fs::create_dir_all(root.join(sub)).unwrap();
            }
            fs::write(
                root.join("webapp/javascript/index.jsx"),
                "const mode = process.env.NODE_ENV;\nexport default mode;\n",
            )
            .unwrap();
            fs::write(
                root.join("webapp/sass/profile.scss"),
                ".logo {\n  background: url('../images/logo.svg');\n}\n",
            )
            .unwrap();
            fs::write(root.join("webapp/images/logo.svg"), "<svg/>").unwrap();
            fs::write(root.join("webapp/templates/index.html"), INDEX_HTML).unwrap();
            fs::write(
                root.join("webapp/templates/standalone.html"),
                "<%= webpack.hash %>",
            )
            .unwrap();

            let config = format!(
                r#"
[build]
root = "webapp/public"

[entries]
app = "./webapp/javascript/index.jsx"
styles = "./webapp/sass/profile.scss"

[templates]
dir = "webapp/templates"
{extra_config}
"#
            );
            fs::write(root.join("forge.toml"), &config).unwrap();
            Self { dir }
        }

        fn config(&self) -> ForgeConfig {
            let content = fs::read_to_string(self.dir.path().join("forge.toml")).unwrap();
            test_parse_config(&content, self.dir.path())
        }

        fn run(&self, mode: BuildMode) -> Result<BuildOutcome> {
            run(&self.config(), mode, None, true)
        }

        fn public(&self) -> std::path::PathBuf {
            self.config().build.root
        }

        fn assets(&self) -> Vec<String> {
            list_relative(&self.config().assets_dir())
        }
    }

    #[test]
    fn test_production_scenario() {
        let project = Project::new("");
        let outcome = project.run(BuildMode::Production).unwrap();
        let hash = &outcome.result.hash;

        let app = outcome.result.entry("app").unwrap();
        let styles = outcome.result.entry("styles").unwrap();
        assert!(app.output_slash().starts_with("app.") && app.output_slash().ends_with(".js"));
        assert!(styles.output_slash().starts_with("styles.") && styles.output_slash().ends_with(".css"));

        let assets = project.assets();
        assert!(assets.contains(&app.output_slash()));
        assert!(assets.contains(&styles.output_slash()));
        assert!(assets.iter().any(|a| a.starts_with("static/img/logo.")));

        // Exactly one page, carrying the overall bundle hash
        assert_eq!(outcome.pages.len(), 1);
        let html = fs::read_to_string(project.public().join("index.html")).unwrap();
        assert!(html.contains(&format!("assets/app.{hash}.js")));
        assert!(html.contains(&format!("assets/styles.{hash}.css")));
        assert!(html.contains(r#"data-mode="production""#));
        assert!(!project.public().join("standalone.html").exists());

        // Production scripts are minified and see the mode constant
        let js = String::from_utf8(app.contents.clone()).unwrap();
        assert!(js.contains("production"));
        assert!(!js.contains("process.env"));
    }

    #[test]
    fn test_development_scenario() {
        let project = Project::new("");
        let outcome = project.run(BuildMode::Development).unwrap();

        assert_eq!(outcome.result.hash, "local");
        assert_eq!(
            project.assets(),
            ["app.local.js", "static/img/logo.local.svg", "styles.local.css"]
        );

        let html = fs::read_to_string(project.public().join("index.html")).unwrap();
        assert!(html.contains("assets/app.local.js"));
        assert!(html.contains("assets/styles.local.css"));
        assert!(html.contains(r#"data-mode="development""#));

        let css = fs::read_to_string(project.config().assets_dir().join("styles.local.css")).unwrap();
        assert!(css.contains("url('../assets/static/img/logo.local.svg')"));
    }

    #[test]
    fn test_repeated_production_runs_are_identical() {
        let project = Project::new("");
        let first = project.run(BuildMode::Production).unwrap();
        let second = project.run(BuildMode::Production).unwrap();
        assert_eq!(first.result.hash, second.result.hash);
        assert_eq!(first.pages, second.pages);
    }

    #[test]
    fn test_transform_failure_leaves_no_assets() {
        let project = Project::new("");
        // A previous good run
        project.run(BuildMode::Production).unwrap();
        fs::write(
            project.dir.path().join("webapp/javascript/index.jsx"),
            "export default function (\n",
        )
        .unwrap();

        let err = project.run(BuildMode::Production).unwrap_err();
        let build_err = err.downcast_ref::<BuildError>().unwrap();
        match build_err {
            BuildError::TransformFailed { entry, stage, .. } => {
                assert_eq!(entry, "app");
                assert_eq!(stage, "minify-js");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(project.assets().is_empty());
    }

    #[test]
    fn test_unresolvable_entry_produces_nothing() {
        let project = Project::new("");
        let mut config = project.config();
        config.entries = crate::config::OrderedTable::new(vec![(
            "app".to_string(),
            "./webapp/javascript/missing".to_string(),
        )]);

        let err = run(&config, BuildMode::Production, None, true).unwrap_err();
        let build_err = err.downcast_ref::<BuildError>().unwrap();
        let BuildError::ResolutionFailed { source, .. } = build_err else {
            panic!("unexpected error: {build_err:?}");
        };
        assert!(matches!(source, ResolutionError::NotFound { .. }));
        assert!(list_relative(&config.assets_dir()).is_empty());
        assert!(!config.build.root.join("index.html").exists());
    }

    #[test]
    fn test_missing_metadata_aborts_before_build() {
        let project = Project::new("");
        let missing = project.dir.path().join("meta.html");
        let err = run(&project.config(), BuildMode::Development, Some(&missing), true).unwrap_err();

        assert!(format!("{err}").contains("extra metadata unavailable"));
        assert!(!project.config().assets_dir().exists());
    }

    #[test]
    fn test_page_write_failure_leaves_no_pages() {
        let project = Project::new("");
        let templates = project.dir.path().join("webapp/templates");
        fs::write(templates.join("welcome.html"), INDEX_HTML).unwrap();
        // `welcome.html` renders after `index.html` and cannot be written
        fs::create_dir_all(project.public().join("welcome.html")).unwrap();

        let err = project.run(BuildMode::Development).unwrap_err();
        assert!(format!("{err}").contains("rendering pages failed"));
        assert!(!project.public().join("index.html").exists());
        assert!(project.assets().is_empty());
    }

    #[test]
    fn test_metadata_injected_verbatim() {
        let project = Project::new("");
        let meta = project.dir.path().join("meta.html");
        fs::write(&meta, r#"<meta name="build" content="1 < 2">"#).unwrap();

        run(&project.config(), BuildMode::Development, Some(&meta), true).unwrap();
        let html = fs::read_to_string(project.public().join("index.html")).unwrap();
        assert!(html.contains(r#"<head><meta name="build" content="1 < 2"><link"#));
    }

    #[test]
    fn test_changing_styles_keeps_script_hash() {
        let project = Project::new("");
        let before = project.run(BuildMode::Production).unwrap();
        fs::write(
            project.dir.path().join("webapp/sass/profile.scss"),
            ".logo { color: red; }\n",
        )
        .unwrap();
        let after = project.run(BuildMode::Production).unwrap();

        assert_eq!(
            before.result.entry("app").unwrap().content_hash,
            after.result.entry("app").unwrap().content_hash
        );
        assert_ne!(
            before.result.entry("styles").unwrap().content_hash,
            after.result.entry("styles").unwrap().content_hash
        );
        assert_ne!(before.result.hash, after.result.hash);
    }

    #[cfg(unix)]
    #[test]
    fn test_user_rule_runs_before_builtins() {
        let project = Project::new(
            r#"
[[rules]]
name = "banner"
category = "script"
order = 10
command = ["sh", "-c", "printf '/* %s */\n' \"$FORGE_ENTRY\"; cat"]
"#,
        );
        let outcome = project.run(BuildMode::Development).unwrap();
        let js = String::from_utf8(outcome.result.entry("app").unwrap().contents.clone()).unwrap();
        assert!(js.starts_with("/* app */\n"));
        assert!(js.contains("\"development\""));
    }

    #[test]
    fn test_copy_patterns_and_manifest() {
        let project = Project::new(
            r#"
[[copy]]
from = "webapp/images"
to = "images"
"#,
        );
        let mut config = project.config();
        config.build.manifest = Some("manifest.json".into());
        run(&config, BuildMode::Development, None, true).unwrap();

        let assets = list_relative(&config.assets_dir());
        assert!(assets.contains(&"images/logo.svg".to_string()));
        assert!(assets.contains(&"manifest.json".to_string()));
    }
}
