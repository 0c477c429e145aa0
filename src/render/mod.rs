//! Page renderer: templates plus build metadata in, HTML pages out.
//!
//! ```text
//! templates/index.html ──┐
//! RenderContext ─────────┼─► <root>/index.html
//!   hash, mode, metadata ┘
//! ```
//!
//! Recognized placeholders:
//!
//! | Placeholder                | Value                           |
//! |----------------------------|---------------------------------|
//! | `<%= hash %>`              | overall bundle hash             |
//! | `<%= webpack.hash %>`      | alias of `hash`                 |
//! | `<%= mode %>`              | `production` / `development`    |
//! | `<%= extra_metadata %>`    | metadata payload, not escaped   |
//!
//! Unknown placeholders are left in place.

mod context;
mod template;

pub use context::{RenderContext, load_metadata, metadata_path};
pub use template::{PageTemplate, load_templates};

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::PathBuf;

use regex::bytes::Captures;
use thiserror::Error;

use template::PLACEHOLDER;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The metadata payload was declared but could not be read.
    #[error("extra metadata unavailable at {}", path.display())]
    MetadataUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O failure at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RenderError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A rendered page, ready to be written once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub output_path: PathBuf,
    pub html: Vec<u8>,
}

pub struct PageRenderer {
    /// Pages are written here, beside (not inside) the assets directory.
    output_root: PathBuf,
    /// Template name excluded from [`render`](Self::render).
    standalone: String,
}

impl PageRenderer {
    pub fn new(output_root: impl Into<PathBuf>, standalone: impl Into<String>) -> Self {
        Self {
            output_root: output_root.into(),
            standalone: standalone.into(),
        }
    }

    /// One page per template, skipping the standalone template.
    pub fn render(&self, templates: &[PageTemplate], ctx: &RenderContext) -> Vec<RenderedPage> {
        templates
            .iter()
            .filter(|t| t.name != self.standalone)
            .map(|t| self.render_one(t, ctx))
            .collect()
    }

    /// Render a single template regardless of its name.
    pub fn render_one(&self, template: &PageTemplate, ctx: &RenderContext) -> RenderedPage {
        let html = PLACEHOLDER.replace_all(template.source.as_bytes(), |caps: &Captures<'_>| {
            let name = std::str::from_utf8(&caps[1]).unwrap_or_default();
            match ctx.lookup(name) {
                Some(value) => Cow::Borrowed(value),
                None => Cow::Owned(caps[0].to_vec()),
            }
        });
        RenderedPage {
            output_path: self.output_root.join(&template.name),
            html: html.into_owned(),
        }
    }

    /// Write pages, creating the output root if needed.
    ///
    /// All or nothing: if one page fails, the pages already written by this
    /// call are removed again.
    pub fn write(&self, pages: &[RenderedPage]) -> Result<(), RenderError> {
        fs::create_dir_all(&self.output_root).map_err(|e| RenderError::io(&self.output_root, e))?;
        for (idx, page) in pages.iter().enumerate() {
            if let Err(e) = fs::write(&page.output_path, &page.html) {
                for written in &pages[..idx] {
                    let _ = fs::remove_file(&written.output_path);
                }
                return Err(RenderError::io(&page.output_path, e));
            }
        }
        Ok(())
    }
}
