//! Configure/compile sequencing for the SDL shared library.

use super::{VersionLatch, tool_detection::cmake_available};
use crate::pipeline::{
    BuildVersion, Error, Invocation, ProcessRunner, Result, Settings,
};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Build phase, reported with failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildPhase {
    Configure,
    Compile,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configure => "configure",
            Self::Compile => "compile",
        })
    }
}

/// Result of a build that did not hit a configuration error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildOutcome {
    /// Both phases exited 0; carries the version reported by configure.
    Succeeded(BuildVersion),
    /// A phase exited non-zero.
    Failed { phase: BuildPhase, exit_code: i32 },
}

/// Drives CMake through configure and compile.
pub struct BuildOrchestrator<'a> {
    runner: &'a ProcessRunner,
    settings: &'a Settings,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(runner: &'a ProcessRunner, settings: &'a Settings) -> Self {
        Self { runner, settings }
    }

    /// Configures `source_dir` into `build_dir`, then compiles
    /// `configuration`.
    ///
    /// # Errors
    ///
    /// - [`Error::SourceDirectoryMissing`] if `source_dir` does not exist
    /// - [`Error::VersionNotFound`] if configure succeeds without printing a
    ///   revision line
    pub async fn build_artifact(
        &self,
        source_dir: &Path,
        build_dir: &Path,
        configuration: &str,
    ) -> Result<BuildOutcome> {
        if !tokio::fs::try_exists(source_dir).await.unwrap_or(false) {
            return Err(Error::SourceDirectoryMissing(source_dir.to_path_buf()));
        }
        let cmake = self.settings.cmake_program();
        if !cmake_available(cmake) {
            self.runner.output().warn(&format!(
                "{} was not found; relying on the shell to resolve it",
                cmake.display()
            ))?;
        }

        let mut latch = VersionLatch::new();
        let exit_code = self
            .runner
            .run_observed(
                Invocation::new(self.configure_command(source_dir, build_dir)),
                |line| latch.observe(line),
            )
            .await?;
        if exit_code != 0 {
            log::error!("configure failed with exit code {exit_code}");
            return Ok(BuildOutcome::Failed {
                phase: BuildPhase::Configure,
                exit_code,
            });
        }
        let version = latch.version().ok_or(Error::VersionNotFound)?;

        let exit_code = self
            .runner
            .run(Invocation::new(self.compile_command(build_dir, configuration)))
            .await?;
        if exit_code != 0 {
            log::error!("compile failed with exit code {exit_code}");
            return Ok(BuildOutcome::Failed {
                phase: BuildPhase::Compile,
                exit_code,
            });
        }

        log::info!("built SDL {version} ({configuration})");
        Ok(BuildOutcome::Succeeded(version))
    }

    /// `cmake -S <src> -B <build> [-G <generator>] -D<opt>=ON|OFF...`
    pub fn configure_command(&self, source_dir: &Path, build_dir: &Path) -> String {
        let mut command = format!(
            "{} -S {} -B {}",
            self.program(),
            quote(&source_dir.display().to_string()),
            quote(&build_dir.display().to_string())
        );
        if let Some(generator) = self.runner.platform().multi_config_generator() {
            command.push_str(&format!(" -G {}", quote(generator)));
        }
        for (name, enabled) in self.settings.build_options() {
            command.push_str(&format!(" -D{name}={}", if *enabled { "ON" } else { "OFF" }));
        }
        command
    }

    /// `cmake --build <build> --config <configuration>`
    pub fn compile_command(&self, build_dir: &Path, configuration: &str) -> String {
        format!(
            "{} --build {} --config {}",
            self.program(),
            quote(&build_dir.display().to_string()),
            quote(configuration)
        )
    }

    /// The CMake executable as it appears on the command line.
    fn program(&self) -> String {
        let program = self.settings.cmake_program().display().to_string();
        if program.contains(char::is_whitespace) {
            quote(&program)
        } else {
            program
        }
    }

    /// Where the compile step leaves the shared library.
    pub fn built_library_path(&self, build_dir: &Path, configuration: &str) -> PathBuf {
        build_dir.join(configuration).join(
            self.runner
                .platform()
                .built_library_name(self.settings.library_name()),
        )
    }
}

/// Double-quotes an argument for `sh -c` and `cmd /C` alike.
fn quote(arg: &str) -> String {
    format!("\"{}\"", arg.replace('"', "\\\""))
}
