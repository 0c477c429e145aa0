//! Built-in transform stages.
//!
//! | Stage        | Category | Order | Registered when            |
//! |--------------|----------|-------|----------------------------|
//! | `define`     | script   | 900   | always                     |
//! | `asset-urls` | style    | 900   | always                     |
//! | `minify-js`  | script   | 1000  | production and `minify`    |
//! | `minify-css` | style    | 1000  | production and `minify`    |
//!
//! User stages from `[[rules]]` run through [`CommandStage`] and usually sit
//! below 900 so they see raw source.

mod command;
mod define;
mod minify;
mod urls;

pub use command::CommandStage;
pub use define::DefineStage;
pub use minify::{MinifyCss, MinifyJs};
pub use urls::AssetUrlStage;

use crate::core::{BuildMode, FileCategory};

use super::{RegistryError, TransformRegistry, TransformStage};

/// Order of the substitution/rewrite stages.
pub const REWRITE_ORDER: i32 = 900;
/// Order of the minifiers, always last.
pub const MINIFY_ORDER: i32 = 1000;

/// Register the built-in stages for `mode`.
pub fn register_builtins(
    registry: &mut TransformRegistry,
    mode: BuildMode,
    minify: bool,
) -> Result<(), RegistryError> {
    registry.register(
        FileCategory::Script,
        TransformStage::new("define", REWRITE_ORDER, DefineStage),
    )?;
    registry.register(
        FileCategory::Style,
        TransformStage::new("asset-urls", REWRITE_ORDER, AssetUrlStage),
    )?;

    if mode.minifies() && minify {
        registry.register(
            FileCategory::Script,
            TransformStage::new("minify-js", MINIFY_ORDER, MinifyJs),
        )?;
        registry.register(
            FileCategory::Style,
            TransformStage::new("minify-css", MINIFY_ORDER, MinifyCss),
        )?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::build::{AssetEmitter, StaticRule};
    use crate::resolve::PathResolver;
    use crate::transform::TransformContext;
    use std::path::Path;

    /// Run `f` with a throwaway context rooted at `/project`.
    pub fn with_ctx<R>(mode: BuildMode, f: impl FnOnce(&TransformContext<'_>) -> R) -> R {
        let resolver = PathResolver::new("/project");
        let registry = TransformRegistry::new();
        let emitter = AssetEmitter::new(StaticRule::default());
        let ctx = TransformContext {
            mode,
            entry: "app",
            source: Path::new("/project/src/index.js"),
            resolver: &resolver,
            registry: &registry,
            emitter: &emitter,
        };
        f(&ctx)
    }

    fn names(registry: &TransformRegistry, category: FileCategory) -> Vec<&str> {
        registry
            .chain_for(category)
            .iter()
            .map(TransformStage::name)
            .collect()
    }

    #[test]
    fn test_development_skips_minifiers() {
        let mut registry = TransformRegistry::new();
        register_builtins(&mut registry, BuildMode::Development, true).unwrap();
        assert_eq!(names(&registry, FileCategory::Script), ["define"]);
        assert_eq!(names(&registry, FileCategory::Style), ["asset-urls"]);
        assert!(names(&registry, FileCategory::Asset).is_empty());
    }

    #[test]
    fn test_production_appends_minifiers() {
        let mut registry = TransformRegistry::new();
        register_builtins(&mut registry, BuildMode::Production, true).unwrap();
        assert_eq!(names(&registry, FileCategory::Script), ["define", "minify-js"]);
        assert_eq!(names(&registry, FileCategory::Style), ["asset-urls", "minify-css"]);
    }

    #[test]
    fn test_minify_disabled_in_production() {
        let mut registry = TransformRegistry::new();
        register_builtins(&mut registry, BuildMode::Production, false).unwrap();
        assert_eq!(names(&registry, FileCategory::Script), ["define"]);
    }

    #[test]
    fn test_user_stage_conflicting_with_builtin() {
        let mut registry = TransformRegistry::new();
        registry
            .register(
                FileCategory::Script,
                TransformStage::from_fn("banner", REWRITE_ORDER, |b, _| Ok(b)),
            )
            .unwrap();
        let err = register_builtins(&mut registry, BuildMode::Development, true).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateOrder { order: 900, .. }));
    }
}
