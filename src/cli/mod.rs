//! Command line interface for the workflow bundler.
//!
//! This module provides argument parsing, command dispatch, and user
//! feedback.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, InstallArgs, ReleaseArgs, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_with(Args::parse_args()).await
}

/// Executes already-parsed arguments
pub async fn run_with(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let runtime = RuntimeConfig::from(&args);

    match &args.command {
        Command::Install(install) => commands::install(&args, install, &runtime).await,
        Command::Release(release) => commands::release(&args, release, &runtime).await,
        Command::Check => commands::check(&args, &runtime).await,
    }
}
