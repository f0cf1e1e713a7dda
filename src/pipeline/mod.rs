//! Build, package and publish pipeline for the SDL2 native runtime.
//!
//! The build side runs once per platform: install toolchain packages,
//! configure and compile SDL with CMake, then package the shared library
//! into `artifact-{rid}.zip`. The publish side runs once, after every
//! platform's artifact has been gathered into one directory: consolidate,
//! assemble a `.nupkg`, push it to a feed.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use sdl_runtime_packager::cli::OutputManager;
//! use sdl_runtime_packager::pipeline::{
//!     Pipeline, Platform, ProcessRunner, SettingsBuilder, load_dependency_specs,
//! };
//!
//! # async fn example() -> sdl_runtime_packager::pipeline::Result<()> {
//! let settings = SettingsBuilder::new().source_dir("SDL").build();
//! let runner = ProcessRunner::new(Platform::current()?, OutputManager::default(), None);
//! let specs = load_dependency_specs(Path::new("dependencies.json")).await?;
//!
//! if let Some(artifact) = Pipeline::new(&settings, &runner).compile(&specs).await? {
//!     println!("{} sha256={}", artifact.path.display(), artifact.checksum);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`process`] - shell command execution with line observation
//! - [`deps`] - platform package installation
//! - [`builder`] - CMake configure/compile and version discovery
//! - [`archive`] - artifact archives and consolidation
//! - [`nuget`] - package assembly and feed push
//! - [`workflow`] - the end-to-end [`Pipeline`]

pub mod archive;
pub mod builder;
pub mod deps;
mod error;
pub mod nuget;
pub mod platform;
pub mod process;
pub mod settings;
mod version;
pub mod workflow;

pub use archive::PackagedArtifact;
pub use builder::{BuildOrchestrator, BuildOutcome, BuildPhase, VersionLatch};
pub use deps::{
    DependencyInstaller, DependencySpecs, PlatformPackageSpec, load_dependency_specs,
    parse_dependency_specs,
};
pub use error::{Context, Error, ErrorExt, Result};
pub use nuget::{NuGetFeed, PackageFeed};
pub use platform::Platform;
pub use process::{Invocation, ProcessRunner};
pub use settings::{
    FeedConfig, PackageMetadata, Settings, SettingsBuilder, SettingsFile, ValidatedFeed,
};
pub use version::BuildVersion;
pub use workflow::{Pipeline, PublishReport};
