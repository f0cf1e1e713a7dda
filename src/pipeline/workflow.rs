//! End-to-end sequencing of the build side and the publish side.
//!
//! Each step either succeeds, ends the run as unsuccessful (`Ok(None)`,
//! later steps are skipped), or fails fatally (`Err`).

use crate::pipeline::{
    BuildOrchestrator, BuildOutcome, DependencyInstaller, DependencySpecs, PackageFeed,
    PackagedArtifact, ProcessRunner, Result, Settings, archive, nuget,
};
use std::path::PathBuf;

/// Artifacts of a successful publish run.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub package_path: PathBuf,
    pub archives: usize,
}

/// Build and publish pipelines over one settings value.
pub struct Pipeline<'a> {
    settings: &'a Settings,
    runner: &'a ProcessRunner,
    dry_run_installs: Option<bool>,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a Settings, runner: &'a ProcessRunner) -> Self {
        Self {
            settings,
            runner,
            dry_run_installs: None,
        }
    }

    /// Forces installer dry-run on or off instead of following the debugger
    /// signal.
    pub fn with_install_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run_installs = Some(dry_run);
        self
    }

    /// Install dependencies → build → package.
    ///
    /// Returns the packaged artifact, or `None` if a step exited non-zero.
    pub async fn compile(&self, specs: &DependencySpecs) -> Result<Option<PackagedArtifact>> {
        let output = self.runner.output();

        output.section("Installing build dependencies")?;
        let mut installer = DependencyInstaller::new(self.runner);
        if let Some(dry_run) = self.dry_run_installs {
            installer = installer.with_dry_run(dry_run);
        }
        if !installer.install_platform_dependencies(specs).await? {
            output.error("dependency installation failed")?;
            return Ok(None);
        }

        output.section("Building SDL")?;
        let builder = BuildOrchestrator::new(self.runner, self.settings);
        let configuration = self.settings.configuration();
        let version = match builder
            .build_artifact(
                self.settings.source_dir(),
                self.settings.build_dir(),
                configuration,
            )
            .await?
        {
            BuildOutcome::Succeeded(version) => version,
            BuildOutcome::Failed { phase, exit_code } => {
                output.error(&format!("{phase} step failed with exit code {exit_code}"))?;
                return Ok(None);
            }
        };
        output.success(&format!("built SDL {version}"))?;

        output.section("Packaging artifact")?;
        let library = builder.built_library_path(self.settings.build_dir(), configuration);
        let platform = self.runner.platform();
        let artifact =
            archive::package_artifact(&library, &version, &platform, self.settings).await?;
        output.success(&format!(
            "{} ({} bytes)",
            artifact.path.display(),
            artifact.size
        ))?;
        output.verbose(&format!("sha256 {}", artifact.checksum))?;

        Ok(Some(artifact))
    }

    /// Consolidate → read version → assemble → push.
    ///
    /// Returns `None` if the feed rejected the package.
    pub async fn publish<F: PackageFeed>(&self, feed: &F) -> Result<Option<PublishReport>> {
        let output = self.runner.output();

        output.section("Consolidating artifacts")?;
        let consolidation = archive::consolidate(
            self.settings.artifacts_dir(),
            self.settings.consolidated_dir(),
        )
        .await?;
        output.success(&format!(
            "expanded {} artifact(s) into {}",
            consolidation.count,
            consolidation.output_dir.display()
        ))?;

        let version =
            archive::read_version_marker(&consolidation.output_dir, self.settings.version_file())
                .await?;
        log::info!("consolidated version {version}");

        output.section("Assembling package")?;
        let package_path =
            nuget::assemble_package(&consolidation.output_dir, &version, self.settings).await?;
        output.success(&package_path.display().to_string())?;

        output.section(&format!("Publishing to `{}`", feed.name()))?;
        if !feed.push(&package_path).await? {
            output.error(&format!("feed `{}` rejected the package", feed.name()))?;
            return Ok(None);
        }
        output.success("package published")?;

        Ok(Some(PublishReport {
            package_path,
            archives: consolidation.count,
        }))
    }
}
