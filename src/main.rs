//! assetforge - static asset build orchestrator.

mod build;
mod cli;
mod config;
mod core;
mod logger;
mod render;
mod resolve;
mod transform;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::build_bundle, resolve::resolve_specifiers};
use config::ForgeConfig;
use core::BuildMode;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ForgeConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { build_args } => {
            logger::set_verbose(build_args.verbose);
            // Decided once; everything downstream receives it by value
            let mode = build_args.mode.unwrap_or_else(BuildMode::from_env);
            crate::debug!("build"; "mode {} (root {})", mode, config.get_root().display());

            if let Err(e) = build_bundle(&config, mode, build_args) {
                report_build_error(&e);
                return Err(e);
            }
            Ok(())
        }
        Commands::Resolve { specifiers } => resolve_specifiers(&config, specifiers).map(|_| ()),
    }
}

/// Name the entry a failed build is attributed to before the error chain.
fn report_build_error(err: &anyhow::Error) {
    let entry = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<build::BuildError>())
        .and_then(build::BuildError::entry);
    match entry {
        Some(entry) => log!("error"; "build aborted at entry `{entry}`"),
        None => log!("error"; "build aborted"),
    }
}
