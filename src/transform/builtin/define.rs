//! Compile-time constant substitution for scripts.
//!
//! Replaces `process.env.NODE_ENV` with the quoted mode name so dead
//! development-only branches can be dropped by the minifier.

use anyhow::Result;
use regex::bytes::Regex;
use std::sync::LazyLock;

use crate::transform::{Transform, TransformContext};

static NODE_ENV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bprocess\.env\.NODE_ENV\b").expect("valid pattern"));

/// Substitutes `process.env.NODE_ENV`.
pub struct DefineStage;

impl Transform for DefineStage {
    fn apply(&self, input: Vec<u8>, ctx: &TransformContext<'_>) -> Result<Vec<u8>> {
        if !NODE_ENV.is_match(&input) {
            return Ok(input);
        }
        let value = format!("\"{}\"", ctx.mode.name());
        Ok(NODE_ENV
            .replace_all(&input, regex::bytes::NoExpand(value.as_bytes()))
            .into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::builtin::tests::with_ctx;
    use crate::core::BuildMode;

    #[test]
    fn test_replaces_node_env() {
        let src = b"if (process.env.NODE_ENV !== 'production') { debug(); }".to_vec();
        let out = with_ctx(BuildMode::Production, |ctx| DefineStage.apply(src, ctx)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "if (\"production\" !== 'production') { debug(); }"
        );
    }

    #[test]
    fn test_leaves_longer_identifiers() {
        let src = b"process.env.NODE_ENVIRONMENT".to_vec();
        let out = with_ctx(BuildMode::Development, |ctx| DefineStage.apply(src.clone(), ctx)).unwrap();
        assert_eq!(out, src);
    }
}
