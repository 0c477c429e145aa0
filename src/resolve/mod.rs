//! Module specifier resolution.
//!
//! Maps logical specifiers (`./webapp/javascript/index`, `@utils/format`,
//! `normalize.css`) to files on disk.
//!
//! Resolution order:
//! 1. Alias table (exact prefix match on the package name, longest key first)
//! 2. Relative/absolute specifiers: joined onto the base directory only
//! 3. Bare specifiers: each search path in declared order, first match wins
//!
//! Every candidate goes through extension expansion: if the candidate has no
//! extension, each configured extension is appended in order. A directory
//! candidate falls back to its `index` file.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default extension order.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".es6", ".js", ".jsx", ".json", ".svg"];

/// Resolution failure. Always fatal for the run.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("cannot resolve `{specifier}` (tried {} paths)", tried.len())]
    NotFound {
        /// The original specifier
        specifier: String,
        /// Paths that were tried (for diagnostics)
        tried: Vec<PathBuf>,
    },
}

impl ResolutionError {
    pub fn specifier(&self) -> &str {
        match self {
            Self::NotFound { specifier, .. } => specifier,
        }
    }

    pub fn tried(&self) -> &[PathBuf] {
        match self {
            Self::NotFound { tried, .. } => tried,
        }
    }
}

/// Resolves specifiers against an alias table and a search-path list.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Base directory for relative specifiers.
    root: PathBuf,
    /// Alias prefix → target path, sorted longest key first.
    alias: Vec<(String, PathBuf)>,
    /// Search paths in declared order.
    modules: Vec<PathBuf>,
    /// Extensions with leading dot, in declared order.
    extensions: Vec<String>,
}

impl PathResolver {
    /// Create a resolver rooted at `root` with the default extension list
    /// and `node_modules` as the only search path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            modules: vec![root.join("node_modules")],
            root,
            alias: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
        }
    }

    /// Replace the extension list. A missing leading dot is added.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| {
                let e = e.as_ref();
                if e.starts_with('.') {
                    e.to_string()
                } else {
                    format!(".{e}")
                }
            })
            .collect();
        self
    }

    /// Replace the search paths. Relative paths are joined onto the root.
    pub fn with_modules<I, P>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.modules = modules
            .into_iter()
            .map(|m| self.root.join(m.as_ref()))
            .collect();
        self
    }

    /// Add an alias. Relative targets are joined onto the root.
    pub fn with_alias(mut self, key: impl Into<String>, target: impl AsRef<Path>) -> Self {
        let key = key.into().trim_end_matches('/').to_string();
        let target = self.root.join(target.as_ref());
        self.alias.push((key, target));
        // Longest key first so `@app/utils` beats `@app`
        self.alias.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a specifier relative to the project root.
    pub fn resolve(&self, specifier: &str) -> Result<PathBuf, ResolutionError> {
        self.resolve_from(specifier, &self.root)
    }

    /// Resolve a specifier relative to `base` (the importing file's directory).
    pub fn resolve_from(&self, specifier: &str, base: &Path) -> Result<PathBuf, ResolutionError> {
        let mut tried = Vec::new();

        if let Some(target) = self.apply_alias(specifier)
            && let Some(found) = self.try_candidate(&target, &mut tried)
        {
            return Ok(found);
        }

        if is_path_like(specifier) {
            let candidate = base.join(specifier);
            if let Some(found) = self.try_candidate(&candidate, &mut tried) {
                return Ok(found);
            }
        } else {
            for dir in &self.modules {
                if let Some(found) = self.try_candidate(&dir.join(specifier), &mut tried) {
                    return Ok(found);
                }
            }
        }

        Err(ResolutionError::NotFound {
            specifier: specifier.to_string(),
            tried,
        })
    }

    /// Rewrite the specifier through the alias table, if a key matches.
    fn apply_alias(&self, specifier: &str) -> Option<PathBuf> {
        self.alias.iter().find_map(|(key, target)| {
            if specifier == key {
                return Some(target.clone());
            }
            let rest = specifier.strip_prefix(key.as_str())?.strip_prefix('/')?;
            Some(target.join(rest))
        })
    }

    /// Try a candidate path with extension expansion and directory index.
    fn try_candidate(&self, candidate: &Path, tried: &mut Vec<PathBuf>) -> Option<PathBuf> {
        tried.push(candidate.to_path_buf());
        if candidate.is_file() {
            return Some(candidate.to_path_buf());
        }

        if candidate.extension().is_none()
            && let Some(found) = self.try_extensions(candidate, tried)
        {
            return Some(found);
        }

        if candidate.is_dir() {
            return self.try_extensions(&candidate.join("index"), tried);
        }
        None
    }

    fn try_extensions(&self, stem: &Path, tried: &mut Vec<PathBuf>) -> Option<PathBuf> {
        for ext in &self.extensions {
            let mut name = stem.as_os_str().to_owned();
            name.push(ext);
            let path = PathBuf::from(name);
            if path.is_file() {
                return Some(path);
            }
            tried.push(path);
        }
        None
    }
}

/// Relative (`./x`, `../x`) or absolute specifiers skip the search paths.
fn is_path_like(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier == "."
        || specifier == ".."
        || Path::new(specifier).is_absolute()
}
