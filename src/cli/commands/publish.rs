//! `publish <FEED>`: consolidate, assemble and push.

use crate::{
    cli::RuntimeConfig,
    error::Result,
    pipeline::{NuGetFeed, Pipeline, Platform, ProcessRunner, Settings},
};

pub async fn publish(feed: &str, settings: &Settings, config: &RuntimeConfig) -> Result<bool> {
    // Checked before any file is touched.
    let feed_config = settings
        .feed(feed)
        .with_env_overrides(feed, |name| std::env::var(name).ok())
        .validate(feed)?;
    log::debug!("feed configuration: {feed_config:?}");

    let runner = ProcessRunner::new(Platform::current()?, *config.output(), settings.command_timeout());
    let report = Pipeline::new(settings, &runner)
        .publish(&NuGetFeed::new(feed_config))
        .await?;

    if let Some(report) = &report {
        config.verbose_println(&format!(
            "{} built from {} artifact(s)",
            report.package_path.display(),
            report.archives
        ))?;
    }
    Ok(report.is_some())
}
