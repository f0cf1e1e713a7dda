//! Subcommand implementations.
//!
//! Each command returns `Ok(true)` on success and `Ok(false)` when an
//! external step failed; configuration problems are errors.

mod compile;
mod publish;

pub use compile::compile;
pub use publish::publish;

use crate::{
    cli::Args,
    error::{CliError, Result},
    pipeline::{Settings, SettingsBuilder, SettingsFile},
};

/// Builds [`Settings`] from the defaults, the optional settings file, then
/// command-line overrides.
pub async fn load_settings(args: &Args) -> Result<Settings> {
    let mut builder = match &args.config {
        Some(path) => {
            if !tokio::fs::try_exists(path).await? {
                return Err(CliError::MissingFile {
                    argument: "--config",
                    path: path.display().to_string(),
                }
                .into());
            }
            log::debug!("loading settings from {}", path.display());
            SettingsFile::load(path).await?.into_builder()
        }
        None => SettingsBuilder::new(),
    };

    if let crate::cli::Command::Compile {
        source_dir: Some(dir),
    } = &args.command
    {
        builder = builder.source_dir(dir);
    }
    if let Some(timeout) = args.command_timeout() {
        builder = builder.command_timeout(timeout);
    }

    Ok(builder.build())
}
