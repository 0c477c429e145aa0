//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::BuildMode;

/// Static asset build orchestrator
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "forge.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the asset bundle, then render the pages that reference it
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Show which file each module specifier resolves to
    #[command(visible_alias = "r")]
    Resolve {
        /// Specifiers as they would appear in `[entries]` or an import
        #[arg(required = true, value_name = "SPECIFIER")]
        specifiers: Vec<String>,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Build mode (production, development). Defaults to `NODE_ENV`
    #[arg(short, long)]
    pub mode: Option<BuildMode>,

    /// File injected verbatim as `extra_metadata`. Defaults to `EXTRA_METADATA`
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub metadata: Option<PathBuf>,

    /// Maximum parallel transforms (0 = one per CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Minify scripts and styles in production
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
}
