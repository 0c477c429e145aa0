//! A single transform stage.

use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;
use thiserror::Error;

use super::TransformContext;

/// A pure bytes-to-bytes step of a transform chain.
pub trait Transform: Send + Sync {
    fn apply(&self, input: Vec<u8>, ctx: &TransformContext<'_>) -> Result<Vec<u8>>;
}

/// Adapter so plain closures can serve as stages.
struct FnTransform<F>(F);

impl<F> Transform for FnTransform<F>
where
    F: Fn(Vec<u8>, &TransformContext<'_>) -> Result<Vec<u8>> + Send + Sync,
{
    fn apply(&self, input: Vec<u8>, ctx: &TransformContext<'_>) -> Result<Vec<u8>> {
        (self.0)(input, ctx)
    }
}

/// A stage rejected its input.
#[derive(Debug, Error)]
#[error("stage `{stage}` failed on {}", file.display())]
pub struct TransformError {
    pub stage: String,
    pub file: PathBuf,
    #[source]
    pub source: anyhow::Error,
}

impl TransformError {
    /// Deepest stage failure behind this one.
    ///
    /// A stage that runs another chain (`asset-urls` emitting an image through
    /// the asset chain) wraps that chain's error; this finds the stage that
    /// actually rejected its input.
    pub fn innermost(&self) -> &TransformError {
        self.source
            .chain()
            .filter_map(|cause| cause.downcast_ref::<TransformError>())
            .last()
            .unwrap_or(self)
    }
}

/// Named, ordered stage with an optional path predicate.
pub struct TransformStage {
    name: String,
    order: i32,
    test: Option<Regex>,
    transform: Box<dyn Transform>,
}

impl TransformStage {
    pub fn new(name: impl Into<String>, order: i32, transform: impl Transform + 'static) -> Self {
        Self {
            name: name.into(),
            order,
            test: None,
            transform: Box::new(transform),
        }
    }

    /// Build a stage from a closure.
    pub fn from_fn<F>(name: impl Into<String>, order: i32, f: F) -> Self
    where
        F: Fn(Vec<u8>, &TransformContext<'_>) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Self::new(name, order, FnTransform(f))
    }

    /// Restrict the stage to paths matching `test`.
    pub fn with_test(mut self, test: Regex) -> Self {
        self.test = Some(test);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    /// Whether this stage applies to `path`. No predicate means every file.
    pub fn matches(&self, path: &Path) -> bool {
        self.test
            .as_ref()
            .is_none_or(|re| re.is_match(&path.to_string_lossy()))
    }

    /// Run the stage, attributing failures to this stage and file.
    pub fn apply(
        &self,
        input: Vec<u8>,
        ctx: &TransformContext<'_>,
    ) -> Result<Vec<u8>, TransformError> {
        self.transform
            .apply(input, ctx)
            .map_err(|source| TransformError {
                stage: self.name.clone(),
                file: ctx.source.to_path_buf(),
                source,
            })
    }
}

impl std::fmt::Debug for TransformStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformStage")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("test", &self.test.as_ref().map(Regex::as_str))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_without_predicate() {
        let stage = TransformStage::from_fn("noop", 0, |input, _| Ok(input));
        assert!(stage.matches(Path::new("any/file.bin")));
    }

    #[test]
    fn test_matches_with_predicate() {
        let stage = TransformStage::from_fn("tsx", 0, |input, _| Ok(input))
            .with_test(Regex::new(r"\.tsx?$").unwrap());
        assert!(stage.matches(Path::new("src/app.tsx")));
        assert!(stage.matches(Path::new("src/app.ts")));
        assert!(!stage.matches(Path::new("src/app.js")));
    }

    #[test]
    fn test_debug_lists_name_and_order() {
        let stage = TransformStage::from_fn("sass", 10, |input, _| Ok(input));
        let debug = format!("{stage:?}");
        assert!(debug.contains("sass"));
        assert!(debug.contains("10"));
    }
}
