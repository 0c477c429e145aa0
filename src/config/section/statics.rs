//! `[static]` section: binary sub-resources referenced from stylesheets.
//!
//! ```toml
//! [static]
//! test = '\.(svg|png|woff2?)(\?.*)?$'
//! output = "static/img"                 # Under the assets directory
//! public_path = "../assets/static/img"  # Prefix of rewritten url(...) references
//! filename = "[name].[hash:8].[ext]"
//! ```
//!
//! The public path is relative so pages keep working when deployed under a
//! sub-path.

use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;

use crate::build::{DEFAULT_STATIC_TEST, NameTemplate, StaticRule};
use crate::config::{ConfigDiagnostics, ConfigError, FieldPath};

use super::build::is_plain_relative;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub test: String,
    pub output: PathBuf,
    pub public_path: String,
    pub filename: String,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            test: DEFAULT_STATIC_TEST.into(),
            output: "static/img".into(),
            public_path: "../assets/static/img".into(),
            filename: "[name].[hash:8].[ext]".into(),
        }
    }
}

pub struct StaticFields {
    pub test: FieldPath,
    pub output: FieldPath,
    pub filename: FieldPath,
}

impl StaticConfig {
    pub const FIELDS: StaticFields = StaticFields {
        test: FieldPath::new("static.test"),
        output: FieldPath::new("static.output"),
        filename: FieldPath::new("static.filename"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Err(e) = Regex::new(&self.test) {
            diag.error(Self::FIELDS.test, format!("invalid regex: {e}"));
        }
        if !is_plain_relative(&self.output) {
            diag.error(
                Self::FIELDS.output,
                format!("`{}` must stay inside the assets directory", self.output.display()),
            );
        }
        if let Err(e) = self.filename.parse::<NameTemplate>() {
            diag.error(Self::FIELDS.filename, e);
        }
    }

    pub fn to_rule(&self) -> Result<StaticRule, ConfigError> {
        let test = Regex::new(&self.test)
            .map_err(|e| ConfigError::Validation(format!("{}: {e}", Self::FIELDS.test.as_str())))?;
        let filename = self
            .filename
            .parse()
            .map_err(|e| ConfigError::Validation(format!("{}: {e}", Self::FIELDS.filename.as_str())))?;
        Ok(StaticRule {
            test,
            output: self.output.clone(),
            public_path: self.public_path.clone(),
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_builtin_rule() {
        let rule = StaticConfig::default().to_rule().unwrap();
        let builtin = StaticRule::default();
        assert_eq!(rule.output, builtin.output);
        assert_eq!(rule.public_path, builtin.public_path);
        assert_eq!(rule.filename, builtin.filename);
        assert_eq!(rule.test.as_str(), builtin.test.as_str());
    }

    #[test]
    fn test_validate() {
        let config = StaticConfig {
            test: "(".into(),
            output: "../img".into(),
            filename: "[hash].[ext]".into(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 3);
    }
}
