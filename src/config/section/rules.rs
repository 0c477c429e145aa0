//! `[[rules]]` external-command transform stages.
//!
//! ```toml
//! [[rules]]
//! name = "sass"
//! category = "style"
//! order = 10
//! test = '\.s[ac]ss$'
//! command = ["npx", "sass", "--stdin", "--load-path=webapp/sass"]
//!
//! [[rules]]
//! name = "esbuild"
//! category = "script"
//! order = 10
//! command = ["esbuild", "--loader=jsx", "--sourcefile=$FORGE_SOURCE"]
//! ```
//!
//! The file is piped to `command` and its stdout replaces the file's bytes.
//! `$FORGE_SOURCE`, `$FORGE_ENTRY` and `$FORGE_MODE` are substituted in the
//! arguments and exported to the command's environment.

use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::FileCategory;
use crate::transform::TransformStage;
use crate::transform::builtin::CommandStage;

/// Commands that fetch packages at run time and may not be on `PATH` yet.
const PACKAGE_RUNNERS: &[&str] = &["npx", "bunx", "pnpx", "yarn", "dlx"];

#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub category: FileCategory,
    pub order: i32,
    /// Regex over the file path; no test means every file of the category.
    #[serde(default)]
    pub test: Option<String>,
    pub command: Vec<String>,
}

pub struct RuleFields {
    pub name: FieldPath,
    pub test: FieldPath,
    pub command: FieldPath,
}

impl RuleConfig {
    pub const FIELDS: RuleFields = RuleFields {
        name: FieldPath::new("rules.name"),
        test: FieldPath::new("rules.test"),
        command: FieldPath::new("rules.command"),
    };

    pub fn validate(&self, idx: usize, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.error(Self::FIELDS.name, format!("[{idx}] rule name is empty"));
        }

        if let Some(test) = &self.test
            && let Err(e) = Regex::new(test)
        {
            diag.error(
                Self::FIELDS.test,
                format!("[{idx}] invalid regex `{test}`: {e}"),
            );
        }

        let Some(cmd) = self.command.first() else {
            diag.error(
                Self::FIELDS.command,
                format!("[{idx}] `{}` has an empty command", self.name),
            );
            return;
        };

        if which::which(cmd).is_err() {
            if PACKAGE_RUNNERS.contains(&cmd.as_str()) {
                if let Some(package) = self.command.get(1) {
                    diag.hint(
                        Self::FIELDS.command,
                        format!("`{package}` via `{cmd}`, ensure the package is installed"),
                    );
                }
            } else {
                diag.error_with_hint(
                    Self::FIELDS.command,
                    format!("[{idx}] `{cmd}` not found"),
                    format!("install the command or update {}", Self::FIELDS.command),
                );
            }
        }
    }

    /// Stage running this rule's command from `root`.
    pub fn to_stage(&self, root: &Path) -> Result<TransformStage, regex::Error> {
        let stage = TransformStage::new(
            self.name.clone(),
            self.order,
            CommandStage::new(self.command.clone(), root),
        );
        Ok(match &self.test {
            Some(test) => stage.with_test(Regex::new(test)?),
            None => stage,
        })
    }
}
