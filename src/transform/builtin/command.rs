//! External-command stages from `[[rules]]`.
//!
//! The file bytes go to the command's stdin and its stdout replaces them.
//! `$FORGE_*` variables are substituted in the arguments and exported to
//! the child's environment.

use anyhow::Result;
use std::path::PathBuf;

use crate::transform::{Transform, TransformContext};
use crate::utils::exec::Cmd;

/// Runs `command` with the file on stdin.
pub struct CommandStage {
    command: Vec<String>,
    /// Working directory for the child process.
    root: PathBuf,
}

impl CommandStage {
    pub fn new(command: Vec<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            command,
            root: root.into(),
        }
    }
}

impl Transform for CommandStage {
    fn apply(&self, input: Vec<u8>, ctx: &TransformContext<'_>) -> Result<Vec<u8>> {
        let vars = forge_vars(ctx);
        let resolved = resolve_args(&self.command, &vars);

        let output = Cmd::from_slice(&resolved)
            .cwd(&self.root)
            .envs(vars)
            .stdin(input)
            .run()?;
        Ok(output.stdout)
    }
}

/// `$FORGE_*` variables for one stage invocation.
fn forge_vars(ctx: &TransformContext<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("FORGE_SOURCE", ctx.source.display().to_string()),
        ("FORGE_ENTRY", ctx.entry.to_string()),
        ("FORGE_MODE", ctx.mode.name().to_string()),
    ]
}

/// Replace `$FORGE_XXX` occurrences in `args`.
fn resolve_args(args: &[String], vars: &[(&str, String)]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            vars.iter().fold(arg.clone(), |acc, (key, value)| {
                acc.replace(&format!("${key}"), value)
            })
        })
        .collect()
}
