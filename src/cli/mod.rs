//! Command line interface for the SDL runtime packager.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, DEFAULT_DEPENDENCIES_FILE, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, Result};

/// Main CLI entry point. Returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let config = RuntimeConfig::from(&args);
    let settings = commands::load_settings(&args).await?;

    let succeeded = match &args.command {
        Command::Compile { .. } => commands::compile(&args, &settings, &config).await?,
        Command::Publish { feed } => commands::publish(feed, &settings, &config).await?,
    };

    Ok(if succeeded { 0 } else { 1 })
}
