//! System package installation for the build toolchain.
//!
//! The mapping from platform key to package list is external configuration
//! (a JSON document). Keys are tried in document order and the first one the
//! running platform matches wins.

use crate::pipeline::{
    Error, ErrorExt, Invocation, Platform, ProcessRunner, Result, platform::debugger_attached,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Package-manager commands and packages for one platform.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformPackageSpec {
    /// Refreshes package indexes, e.g. `sudo apt-get update`.
    #[serde(default)]
    pub update_command: Option<String>,

    /// Command the package identifiers are appended to, e.g.
    /// `sudo apt-get install -y`.
    #[serde(default)]
    pub install_command: Option<String>,

    /// Required; `null` is rejected at parse time.
    pub packages: Vec<String>,
}

/// Platform key → spec, in document order.
pub type DependencySpecs = IndexMap<String, PlatformPackageSpec>;

/// Parses a dependency mapping document.
pub fn parse_dependency_specs(json: &str) -> Result<DependencySpecs> {
    Ok(serde_json::from_str(json)?)
}

/// Loads a dependency mapping from disk.
pub async fn load_dependency_specs(path: &Path) -> Result<DependencySpecs> {
    let text = tokio::fs::read_to_string(path)
        .await
        .fs_context("reading dependency specification", path)?;
    parse_dependency_specs(&text)
}

/// First entry whose key the platform matches.
pub fn select_platform_spec<'a>(
    specs: &'a DependencySpecs,
    platform: &Platform,
) -> Option<(&'a str, &'a PlatformPackageSpec)> {
    specs
        .iter()
        .find(|(key, _)| platform.matches(key))
        .map(|(key, spec)| (key.as_str(), spec))
}

/// Installs the running platform's build dependencies.
pub struct DependencyInstaller<'a> {
    runner: &'a ProcessRunner,
    dry_run: bool,
}

impl<'a> DependencyInstaller<'a> {
    /// Dry-runs while a debugger is attached so interactive sessions never
    /// touch the system package manager.
    pub fn new(runner: &'a ProcessRunner) -> Self {
        Self {
            runner,
            dry_run: debugger_attached(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs the update command (if any) and then the install command.
    ///
    /// Returns `Ok(true)` when there is nothing to install for this platform
    /// or the install exits 0, `Ok(false)` when either command exits
    /// non-zero (install is skipped after a failed update).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDependencySpec`] when the matched spec has no
    /// packages or no install command.
    pub async fn install_platform_dependencies(&self, specs: &DependencySpecs) -> Result<bool> {
        let platform = self.runner.platform();
        let Some((key, spec)) = select_platform_spec(specs, &platform) else {
            log::info!("no dependency entry matches {platform}; nothing to install");
            return Ok(true);
        };
        log::info!("installing dependencies for {platform} using entry `{key}`");

        let install_command = install_command_line(key, spec)?;

        if let Some(update) = spec
            .update_command
            .as_deref()
            .filter(|c| !c.trim().is_empty())
        {
            let code = self
                .runner
                .run(Invocation::new(update).dry_run(self.dry_run))
                .await?;
            if code != 0 {
                log::error!("package index update failed with exit code {code}");
                return Ok(false);
            }
        }

        let code = self
            .runner
            .run(Invocation::new(install_command).dry_run(self.dry_run))
            .await?;
        if code != 0 {
            log::error!("package installation failed with exit code {code}");
        }
        Ok(code == 0)
    }
}

/// `installCommand` followed by every package, space-separated.
fn install_command_line(key: &str, spec: &PlatformPackageSpec) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidDependencySpec {
        platform: key.to_string(),
        reason: reason.to_string(),
    };

    if spec.packages.is_empty() {
        return Err(invalid("`packages` is empty"));
    }
    let install = spec
        .install_command
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| invalid("`installCommand` is missing"))?;

    let mut line = install.to_string();
    for package in &spec.packages {
        line.push(' ');
        line.push_str(package);
    }
    Ok(line)
}
