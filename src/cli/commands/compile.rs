//! `compile`: install, build and package for the running platform.

use crate::{
    cli::{Args, RuntimeConfig},
    error::{CliError, Result},
    pipeline::{DependencySpecs, Pipeline, Platform, ProcessRunner, Settings, load_dependency_specs},
};

pub async fn compile(args: &Args, settings: &Settings, config: &RuntimeConfig) -> Result<bool> {
    let platform = Platform::current()?;
    config.verbose_println(&format!("platform: {platform}"))?;

    let specs = dependency_specs(args, config).await?;
    let runner = ProcessRunner::new(platform, *config.output(), settings.command_timeout());

    let artifact = Pipeline::new(settings, &runner).compile(&specs).await?;
    Ok(artifact.is_some())
}

/// Loads the dependency mapping. A missing default file means nothing to
/// install; a missing explicit file is an error.
async fn dependency_specs(args: &Args, config: &RuntimeConfig) -> Result<DependencySpecs> {
    let (path, explicit) = args.dependencies_file();

    if !tokio::fs::try_exists(&path).await? {
        if explicit {
            return Err(CliError::MissingFile {
                argument: "--dependencies",
                path: path.display().to_string(),
            }
            .into());
        }
        config.warning_println(&format!(
            "{} not found; skipping dependency installation",
            path.display()
        ))?;
        return Ok(DependencySpecs::new());
    }

    Ok(load_dependency_specs(&path).await?)
}
