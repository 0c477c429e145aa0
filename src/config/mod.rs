//! Project configuration from `forge.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Section definitions ([build], [resolve], [[rules]], ...)
//! ├── types/         # ConfigError, diagnostics, field paths, ordered tables
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # ForgeConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! [build]
//! root = "webapp/public"
//!
//! [entries]
//! app = "./webapp/javascript/index.jsx"
//! styles = "./webapp/sass/profile.scss"
//!
//! [resolve]
//! modules = ["node_modules", "webapp"]
//!
//! [[rules]]
//! name = "sass"
//! category = "style"
//! order = 10
//! command = ["sass", "--stdin"]
//!
//! [[copy]]
//! from = "webapp/images"
//! to = "images"
//!
//! [templates]
//! dir = "webapp/templates"
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BuildSectionConfig, CopyConfig, ResolveConfig, RuleConfig, StaticConfig, TemplatesConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, OrderedTable};

use crate::build::{BuildOptions, Entry};
use crate::cli::{BuildArgs, Cli, Commands};
use crate::core::{BuildMode, FileCategory};
use crate::log;
use crate::render::PageRenderer;
use crate::resolve::PathResolver;
use crate::transform::TransformRegistry;
use crate::transform::builtin::{MINIFY_ORDER, REWRITE_ORDER, register_builtins};
use crate::utils::path::{normalize_path, resolve_from_root};
use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

const ENTRIES_FIELD: FieldPath = FieldPath::new("entries");
const RULES_ORDER_FIELD: FieldPath = FieldPath::new("rules.order");

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing forge.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForgeConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root, parent of the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Logical name → entry specifier, in declaration order
    #[serde(default)]
    pub entries: OrderedTable<String>,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    #[serde(default, rename = "static")]
    pub statics: StaticConfig,

    #[serde(default)]
    pub copy: Vec<CopyConfig>,

    #[serde(default)]
    pub templates: TemplatesConfig,
}

impl ForgeConfig {
    /// Load configuration for `cli`, searching upward from cwd.
    ///
    /// The project root is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let Some(config_path) = find_config_file(&cli.config) else {
            bail!(ConfigError::Validation(format!(
                "config file `{}` not found in this directory or any parent",
                cli.config.display()
            )));
        };

        let mut config = Self::from_path(&config_path)?;
        config.finalize(&config_path);
        if let Commands::Build { build_args } = &cli.command {
            config.apply_build_args(build_args);
        }
        config.validate(&cli.command)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Set the root and make every configured path absolute.
    fn finalize(&mut self, config_path: &Path) {
        self.config_path = normalize_path(config_path);
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.normalize_paths(&root);
    }

    fn normalize_paths(&mut self, root: &Path) {
        self.root = normalize_path(root);
        let root = self.root.clone();

        self.build.root = resolve_from_root(&self.build.root, &root);
        self.templates.dir = resolve_from_root(&self.templates.dir, &root);
        for module in &mut self.resolve.modules {
            *module = resolve_from_root(module, &root);
        }
        for (_, target) in self.resolve.alias.iter_mut() {
            *target = resolve_from_root(target, &root);
        }
        for copy in &mut self.copy {
            copy.from = resolve_from_root(&copy.from, &root);
        }
    }

    /// CLI flags override `[build]`.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        Self::update_option(&mut self.build.jobs, args.jobs.as_ref());
        Self::update_option(&mut self.build.minify, args.minify.as_ref());
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the configuration, collecting every problem before failing.
    pub fn validate(&self, command: &Commands) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.resolve.validate(&mut diag);
        self.statics.validate(&mut diag);
        for (idx, rule) in self.rules.iter().enumerate() {
            rule.validate(idx, &mut diag);
        }
        self.validate_rule_orders(&mut diag);
        for (idx, copy) in self.copy.iter().enumerate() {
            copy.validate(idx, &mut diag);
        }

        if let Commands::Build { .. } = command {
            if self.entries.is_empty() {
                diag.error_with_hint(
                    ENTRIES_FIELD,
                    "no entries declared",
                    "add e.g. `app = \"./src/index.js\"` under [entries]",
                );
            }
            self.templates.validate(&mut diag);
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Two stages of one category must not share an order; 900 and 1000 are
    /// taken by the built-ins for scripts and styles.
    fn validate_rule_orders(&self, diag: &mut ConfigDiagnostics) {
        let mut taken: FxHashMap<(FileCategory, i32), &str> = FxHashMap::default();
        for category in [FileCategory::Script, FileCategory::Style] {
            taken.insert((category, REWRITE_ORDER), "built-in");
            taken.insert((category, MINIFY_ORDER), "built-in");
        }

        for (idx, rule) in self.rules.iter().enumerate() {
            if let Some(existing) = taken.insert((rule.category, rule.order), &rule.name) {
                diag.error(
                    RULES_ORDER_FIELD,
                    format!(
                        "[{idx}] `{}` uses order {} in the {} chain, already taken by `{existing}`",
                        rule.name, rule.order, rule.category
                    ),
                );
            }
        }
    }

    // ========================================================================
    // component construction
    // ========================================================================

    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .iter()
            .map(|(name, source)| Entry::new(name, source.as_str()))
            .collect()
    }

    pub fn resolver(&self) -> PathResolver {
        self.resolve.resolver(&self.root)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.build.assets_dir()
    }

    pub fn build_options(&self) -> Result<BuildOptions> {
        let filename = self.build.filename.parse().map_err(|e| {
            ConfigError::Validation(format!(
                "{}: {e}",
                BuildSectionConfig::FIELDS.filename.as_str()
            ))
        })?;
        Ok(BuildOptions {
            assets_dir: self.assets_dir(),
            filename,
            jobs: self.build.jobs,
            statics: self.statics.to_rule()?,
            copies: self.copy.iter().map(CopyConfig::to_pattern).collect(),
            manifest: self.build.manifest.clone(),
        })
    }

    /// User rules plus the built-in stages for `mode`.
    pub fn transform_registry(&self, mode: BuildMode) -> Result<TransformRegistry> {
        let mut registry = TransformRegistry::new();
        for rule in &self.rules {
            let stage = rule
                .to_stage(&self.root)
                .with_context(|| format!("rule `{}`", rule.name))?;
            registry.register(rule.category, stage)?;
        }
        register_builtins(&mut registry, mode, self.build.minify)?;
        Ok(registry)
    }

    pub fn renderer(&self) -> PageRenderer {
        PageRenderer::new(&self.build.root, self.templates.standalone.as_str())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse `content` as if it were `<root>/forge.toml`.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str, root: &Path) -> ForgeConfig {
    let (mut parsed, ignored) = ForgeConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed.finalize(&root.join("forge.toml"));
    parsed
}

// ============================================================================
// tests
// ============================================================================
