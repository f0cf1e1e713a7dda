//! Command line argument parsing and validation.

use clap::{Parser, Subcommand};
use std::{path::PathBuf, time::Duration};

/// Dependency mapping read when `--dependencies` is not given.
pub const DEFAULT_DEPENDENCIES_FILE: &str = "dependencies.json";

/// SDL2 native runtime build and packaging tool
#[derive(Parser, Debug)]
#[command(
    name = "sdl_runtime_packager",
    version,
    about = "Builds SDL2 per platform and publishes the runtimes as one NuGet package",
    long_about = "Builds the SDL2 shared library with CMake and publishes every platform's build as one NuGet package.

Run `compile` once on each target platform. It installs the toolchain packages listed for the
platform in the dependency mapping, configures and builds SDL, and writes artifacts/artifact-<rid>.zip.

Gather every artifact-*.zip into one artifacts directory, then run `publish <FEED>` once. It merges
the archives, assembles <id>.<version>.nupkg and pushes it to the feed.

Usage:
  sdl_runtime_packager compile
  sdl_runtime_packager --config packaging.json compile --source-dir vendor/SDL
  NUGET_FEED_API_KEY=... sdl_runtime_packager publish nuget

Exit code 0 = every step succeeded; 1 = a step failed or the configuration is invalid."
)]
pub struct Args {
    /// JSON settings file layered over the built-in defaults
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Platform dependency mapping [default: dependencies.json]
    #[arg(short, long, global = true, value_name = "PATH")]
    pub dependencies: Option<PathBuf>,

    /// Kill any external command that runs longer than this many seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print extra detail (platform, checksums)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print command echoes, relayed output and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Pipeline entry points.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Install dependencies, build SDL and package this platform's artifact
    Compile {
        /// SDL source checkout (overrides the settings file)
        #[arg(long, value_name = "DIR")]
        source_dir: Option<PathBuf>,
    },

    /// Consolidate gathered artifacts, assemble the package and push it
    Publish {
        /// Feed id; configuration comes from `feeds.<FEED>` in the settings
        /// file and the <FEED>_FEED_URL / <FEED>_FEED_API_KEY variables
        #[arg(value_name = "FEED")]
        feed: String,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == Some(0) {
            return Err("--timeout must be at least 1 second".to_string());
        }

        if let Command::Publish { feed } = &self.command
            && feed.trim().is_empty()
        {
            return Err("Feed id cannot be empty".to_string());
        }

        Ok(())
    }

    /// Dependency mapping path and whether it was given explicitly.
    pub fn dependencies_file(&self) -> (PathBuf, bool) {
        match &self.dependencies {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_DEPENDENCIES_FILE), false),
        }
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }
}
