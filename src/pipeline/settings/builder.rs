//! Builder for constructing Settings.

use super::{FeedConfig, PackageMetadata, Settings};
use indexmap::IndexMap;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Builder for [`Settings`].
///
/// Every field has a default, so `SettingsBuilder::new().build()` yields the
/// stock SDL2 configuration: `SDL` → `build` → `artifacts`, `Release`, and
/// the `SDL_STATIC=OFF SDL_SHARED=ON SDL_TEST=OFF` option set.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    source_dir: Option<PathBuf>,
    build_dir: Option<PathBuf>,
    artifacts_dir: Option<PathBuf>,
    consolidated_dir: Option<PathBuf>,
    packages_dir: Option<PathBuf>,
    configuration: Option<String>,
    cmake_program: Option<PathBuf>,
    library_name: Option<String>,
    version_file: Option<String>,
    build_options: Option<IndexMap<String, bool>>,
    package: Option<PackageMetadata>,
    command_timeout: Option<Duration>,
    feeds: IndexMap<String, FeedConfig>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the artifacts directory.
    ///
    /// Unless set explicitly, the consolidated and packages directories are
    /// derived from it (`<artifacts>/consolidated`, `<artifacts>/packages`).
    pub fn artifacts_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.artifacts_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn consolidated_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.consolidated_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn packages_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.packages_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = Some(configuration.into());
        self
    }

    /// CMake executable to invoke. Defaults to `cmake` on `PATH`.
    pub fn cmake_program<P: AsRef<Path>>(mut self, program: P) -> Self {
        self.cmake_program = Some(program.as_ref().to_path_buf());
        self
    }

    pub fn library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = Some(name.into());
        self
    }

    pub fn version_file(mut self, name: impl Into<String>) -> Self {
        self.version_file = Some(name.into());
        self
    }

    /// Replaces the whole configure option set. Order is preserved.
    pub fn build_options(mut self, options: IndexMap<String, bool>) -> Self {
        self.build_options = Some(options);
        self
    }

    pub fn package(mut self, package: PackageMetadata) -> Self {
        self.package = Some(package);
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    pub fn feed(mut self, name: impl Into<String>, feed: FeedConfig) -> Self {
        self.feeds.insert(name.into(), feed);
        self
    }

    pub fn build(self) -> Settings {
        let artifacts_dir = self
            .artifacts_dir
            .unwrap_or_else(|| PathBuf::from("artifacts"));
        let consolidated_dir = self
            .consolidated_dir
            .unwrap_or_else(|| artifacts_dir.join("consolidated"));
        let packages_dir = self
            .packages_dir
            .unwrap_or_else(|| artifacts_dir.join("packages"));

        Settings::new(
            self.source_dir.unwrap_or_else(|| PathBuf::from("SDL")),
            self.build_dir.unwrap_or_else(|| PathBuf::from("build")),
            artifacts_dir,
            consolidated_dir,
            packages_dir,
            self.configuration.unwrap_or_else(|| "Release".to_string()),
            self.cmake_program.unwrap_or_else(|| PathBuf::from("cmake")),
            self.library_name.unwrap_or_else(|| "SDL2".to_string()),
            self.version_file
                .unwrap_or_else(|| "version.txt".to_string()),
            self.build_options.unwrap_or_else(default_build_options),
            self.package.unwrap_or_default(),
            self.command_timeout,
            self.feeds,
        )
    }
}

/// Shared library only, no tests.
pub fn default_build_options() -> IndexMap<String, bool> {
    IndexMap::from([
        ("SDL_STATIC".to_string(), false),
        ("SDL_SHARED".to_string(), true),
        ("SDL_TEST".to_string(), false),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_stock_sdl2_build() {
        let settings = SettingsBuilder::new().build();
        assert_eq!(settings.source_dir(), Path::new("SDL"));
        assert_eq!(settings.configuration(), "Release");
        assert_eq!(settings.cmake_program(), Path::new("cmake"));
        assert_eq!(settings.library_name(), "SDL2");
        assert_eq!(settings.version_file(), "version.txt");
        assert_eq!(settings.command_timeout(), None);

        let options: Vec<_> = settings
            .build_options()
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(
            options,
            [("SDL_STATIC", false), ("SDL_SHARED", true), ("SDL_TEST", false)]
        );
    }

    #[test]
    fn output_dirs_follow_artifacts_dir() {
        let settings = SettingsBuilder::new().artifacts_dir("/tmp/out").build();
        assert_eq!(settings.consolidated_dir(), Path::new("/tmp/out/consolidated"));
        assert_eq!(settings.packages_dir(), Path::new("/tmp/out/packages"));
        assert_eq!(
            settings.artifact_path("linux-x64"),
            Path::new("/tmp/out/artifact-linux-x64.zip")
        );
    }

    #[test]
    fn unknown_feed_is_empty() {
        let feed = SettingsBuilder::new().build().feed("missing");
        assert!(feed.url.is_none());
        assert!(feed.api_key.is_none());
    }
}
