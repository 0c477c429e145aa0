//! Production minification stages.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Unlike opportunistic
//! minification of copied assets, a parse failure here fails the stage.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::transform::{Transform, TransformContext};

/// Minify JavaScript source code.
///
/// `source_type` selects the syntax accepted (JSX, TypeScript); the output
/// keeps that syntax.
pub fn minify_js(source: &str, source_type: SourceType) -> Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(first) = ret.errors.first() {
        return Err(anyhow!(
            "{} parse error(s), first: {}",
            ret.errors.len(),
            first
        ));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| anyhow!("css parse error: {e}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("css print error: {e}"))?;
    Ok(result.code)
}

fn utf8(input: Vec<u8>) -> Result<String> {
    String::from_utf8(input).map_err(|e| anyhow!("input is not valid UTF-8: {e}"))
}

/// `minify-js` stage.
pub struct MinifyJs;

impl Transform for MinifyJs {
    fn apply(&self, input: Vec<u8>, ctx: &TransformContext<'_>) -> Result<Vec<u8>> {
        let source_type = SourceType::from_path(ctx.source).unwrap_or_else(|_| SourceType::mjs());
        minify_js(&utf8(input)?, source_type).map(String::into_bytes)
    }
}

/// `minify-css` stage.
pub struct MinifyCss;

impl Transform for MinifyCss {
    fn apply(&self, input: Vec<u8>, _ctx: &TransformContext<'_>) -> Result<Vec<u8>> {
        minify_css(&utf8(input)?).map(String::into_bytes)
    }
}
