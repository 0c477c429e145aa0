//! Page templates and their placeholders.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::bytes::Regex;

use super::RenderError;

/// `<%= name %>`, names may be dotted (`webpack.hash`).
pub(super) static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<%=\s*([A-Za-z0-9_.]+)\s*%>").expect("valid pattern"));

/// An HTML template loaded from the templates directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    /// File name, also the rendered page's file name.
    pub name: String,
    pub source: String,
    /// Placeholder names the template references.
    pub placeholders: BTreeSet<String>,
}

impl PageTemplate {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let placeholders = PLACEHOLDER
            .captures_iter(source.as_bytes())
            .filter_map(|caps| caps.get(1))
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
            .collect();
        Self {
            name: name.into(),
            source,
            placeholders,
        }
    }
}

/// Every `*.html` file directly inside `dir`, sorted by name.
pub fn load_templates(dir: &Path) -> Result<Vec<PageTemplate>, RenderError> {
    let entries = fs::read_dir(dir).map_err(|e| RenderError::io(dir, e))?;

    let mut templates = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| RenderError::io(dir, e))?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let source = fs::read_to_string(&path).map_err(|e| RenderError::io(&path, e))?;
        templates.push(PageTemplate::new(name, source));
    }
    templates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collects_placeholders() {
        let t = PageTemplate::new(
            "index.html",
            r#"<script src="assets/app.<%= webpack.hash %>.js"></script><%=mode%><%= extra_metadata %><%= webpack.hash %>"#,
        );
        let names: Vec<_> = t.placeholders.iter().map(String::as_str).collect();
        assert_eq!(names, ["extra_metadata", "mode", "webpack.hash"]);
    }

    #[test]
    fn test_load_templates_sorted_html_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<%= hash %>").unwrap();
        fs::write(dir.path().join("comparison.html"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("partials.html")).unwrap();

        let templates = load_templates(dir.path()).unwrap();
        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["comparison.html", "index.html"]);
        assert!(templates[1].placeholders.contains("hash"));
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_templates(&dir.path().join("templates")).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
