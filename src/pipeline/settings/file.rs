//! Optional JSON settings file layered over the defaults.

use super::{FeedConfig, PackageMetadata, SettingsBuilder};
use crate::pipeline::{ErrorExt, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::{path::{Path, PathBuf}, time::Duration};

/// On-disk shape of the settings file. Every key is optional and unknown keys
/// are ignored.
///
/// ```json
/// {
///   "sourceDir": "SDL",
///   "configuration": "Release",
///   "buildOptions": { "SDL_STATIC": false, "SDL_SHARED": true, "SDL_TEST": false },
///   "package": { "id": "SDL2.Native" },
///   "commandTimeoutSecs": 3600,
///   "feeds": { "nuget": { "url": "https://www.nuget.org/api/v2/package" } }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsFile {
    pub source_dir: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub artifacts_dir: Option<PathBuf>,
    pub consolidated_dir: Option<PathBuf>,
    pub packages_dir: Option<PathBuf>,
    pub configuration: Option<String>,
    pub cmake_program: Option<PathBuf>,
    pub library_name: Option<String>,
    pub version_file: Option<String>,
    pub build_options: Option<IndexMap<String, bool>>,
    pub package: Option<PackageMetadata>,
    pub command_timeout_secs: Option<u64>,
    pub feeds: IndexMap<String, FeedConfig>,
}

impl SettingsFile {
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .fs_context("reading settings file", path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Seeds a builder with every value present in the file.
    pub fn into_builder(self) -> SettingsBuilder {
        let mut builder = SettingsBuilder::new();

        if let Some(dir) = self.source_dir {
            builder = builder.source_dir(dir);
        }
        if let Some(dir) = self.build_dir {
            builder = builder.build_dir(dir);
        }
        if let Some(dir) = self.artifacts_dir {
            builder = builder.artifacts_dir(dir);
        }
        if let Some(dir) = self.consolidated_dir {
            builder = builder.consolidated_dir(dir);
        }
        if let Some(dir) = self.packages_dir {
            builder = builder.packages_dir(dir);
        }
        if let Some(configuration) = self.configuration {
            builder = builder.configuration(configuration);
        }
        if let Some(program) = self.cmake_program {
            builder = builder.cmake_program(program);
        }
        if let Some(name) = self.library_name {
            builder = builder.library_name(name);
        }
        if let Some(name) = self.version_file {
            builder = builder.version_file(name);
        }
        if let Some(options) = self.build_options {
            builder = builder.build_options(options);
        }
        if let Some(package) = self.package {
            builder = builder.package(package);
        }
        if let Some(secs) = self.command_timeout_secs {
            builder = builder.command_timeout(Duration::from_secs(secs));
        }
        for (name, feed) in self.feeds {
            builder = builder.feed(name, feed);
        }

        builder
    }
}
