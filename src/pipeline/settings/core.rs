//! Core Settings struct and accessors.

use super::{FeedConfig, PackageMetadata};
use indexmap::IndexMap;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Immutable pipeline configuration.
///
/// Constructed through [`SettingsBuilder`](super::SettingsBuilder):
///
/// ```no_run
/// use sdl_runtime_packager::pipeline::SettingsBuilder;
///
/// # fn example() -> sdl_runtime_packager::pipeline::Result<()> {
/// let settings = SettingsBuilder::new()
///     .source_dir("third_party/SDL")
///     .build_dir("target/sdl-build")
///     .configuration("RelWithDebInfo")
///     .build();
/// assert_eq!(settings.library_name(), "SDL2");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// SDL checkout passed to `cmake -S`.
    source_dir: PathBuf,

    /// CMake binary directory passed to `cmake -B`.
    build_dir: PathBuf,

    /// Where per-platform `artifact-{rid}.zip` files are written and found.
    artifacts_dir: PathBuf,

    /// Shared output tree that consolidation expands artifacts into.
    consolidated_dir: PathBuf,

    /// Where the assembled `.nupkg` is written.
    packages_dir: PathBuf,

    /// CMake configuration passed to `--config`.
    configuration: String,

    /// CMake executable, resolved by the shell when it is a bare name.
    cmake_program: PathBuf,

    /// Library base name without prefix or extension.
    library_name: String,

    /// Name of the version marker entry at the artifact root.
    version_file: String,

    /// `-D` definitions for configure, in insertion order.
    build_options: IndexMap<String, bool>,

    package: PackageMetadata,

    /// Upper bound for any single external command. `None` waits forever.
    command_timeout: Option<Duration>,

    feeds: IndexMap<String, FeedConfig>,
}

impl Settings {
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn consolidated_dir(&self) -> &Path {
        &self.consolidated_dir
    }

    pub fn packages_dir(&self) -> &Path {
        &self.packages_dir
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    pub fn cmake_program(&self) -> &Path {
        &self.cmake_program
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    pub fn version_file(&self) -> &str {
        &self.version_file
    }

    pub fn build_options(&self) -> &IndexMap<String, bool> {
        &self.build_options
    }

    pub fn package(&self) -> &PackageMetadata {
        &self.package
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout
    }

    /// Feed configuration from the settings file, empty when the feed is not
    /// listed. Environment overrides are applied by the caller.
    pub fn feed(&self, name: &str) -> FeedConfig {
        self.feeds.get(name).cloned().unwrap_or_default()
    }

    /// Deterministic artifact path for one runtime identifier.
    pub fn artifact_path(&self, runtime_identifier: &str) -> PathBuf {
        self.artifacts_dir
            .join(format!("artifact-{runtime_identifier}.zip"))
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        source_dir: PathBuf,
        build_dir: PathBuf,
        artifacts_dir: PathBuf,
        consolidated_dir: PathBuf,
        packages_dir: PathBuf,
        configuration: String,
        cmake_program: PathBuf,
        library_name: String,
        version_file: String,
        build_options: IndexMap<String, bool>,
        package: PackageMetadata,
        command_timeout: Option<Duration>,
        feeds: IndexMap<String, FeedConfig>,
    ) -> Self {
        Self {
            source_dir,
            build_dir,
            artifacts_dir,
            consolidated_dir,
            packages_dir,
            configuration,
            cmake_program,
            library_name,
            version_file,
            build_options,
            package,
            command_timeout,
            feeds,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        super::SettingsBuilder::new().build()
    }
}
