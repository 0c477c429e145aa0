//! Stylesheet `url(...)` rewriting.
//!
//! Every relative reference that matches the static rule is emitted as a
//! hashed static artifact and rewritten to its public path:
//!
//! ```text
//! url("../images/logo.svg")  →  url("../assets/static/img/logo.1a2b3c4d.svg")
//! url(~font-awesome/fonts/fa.woff2?v=4.7)  →  url(../assets/static/img/fa.5e6f7a8b.woff2?v=4.7)
//! ```
//!
//! A leading `~` resolves through the search paths instead of the
//! stylesheet's directory. References that cannot be resolved fail the stage.

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use std::sync::LazyLock;

use crate::transform::{Transform, TransformContext};

static URL_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^'")\s]+))\s*\)"#).expect("valid pattern")
});

/// `asset-urls` stage.
pub struct AssetUrlStage;

impl Transform for AssetUrlStage {
    fn apply(&self, input: Vec<u8>, ctx: &TransformContext<'_>) -> Result<Vec<u8>> {
        let css = String::from_utf8(input).map_err(|e| anyhow!("input is not valid UTF-8: {e}"))?;

        let mut out = String::with_capacity(css.len());
        let mut last = 0;
        for caps in URL_REF.captures_iter(&css) {
            let Some(whole) = caps.get(0) else { continue };
            let (reference, quote) = match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(m), _, _) => (m.as_str(), "\""),
                (_, Some(m), _) => (m.as_str(), "'"),
                (_, _, Some(m)) => (m.as_str(), ""),
                _ => continue,
            };

            if !should_rewrite(reference, ctx) {
                continue;
            }

            let public = rewrite(reference, ctx)
                .with_context(|| format!("url({reference}) in {}", ctx.source.display()))?;
            out.push_str(&css[last..whole.start()]);
            out.push_str(&format!("url({quote}{public}{quote})"));
            last = whole.end();
        }
        out.push_str(&css[last..]);
        Ok(out.into_bytes())
    }
}

/// Only relative file references that the static rule claims.
fn should_rewrite(reference: &str, ctx: &TransformContext<'_>) -> bool {
    let external = reference.is_empty()
        || reference.starts_with("data:")
        || reference.starts_with('#')
        || reference.starts_with('/')
        || reference.contains("://");
    !external && ctx.emitter.rule().matches(reference)
}

/// Resolve, emit, and return the public URL (query/fragment preserved).
fn rewrite(reference: &str, ctx: &TransformContext<'_>) -> Result<String> {
    let split = reference.find(['?', '#']).unwrap_or(reference.len());
    let (path, suffix) = reference.split_at(split);

    let resolved = match path.strip_prefix('~') {
        Some(module) => ctx.resolver.resolve(module)?,
        None if path.starts_with("./") || path.starts_with("../") => {
            ctx.resolver.resolve_from(path, ctx.source_dir())?
        }
        None => ctx
            .resolver
            .resolve_from(&format!("./{path}"), ctx.source_dir())?,
    };

    let url = ctx.emitter.emit(&resolved, ctx)?;
    Ok(format!("{url}{suffix}"))
}
