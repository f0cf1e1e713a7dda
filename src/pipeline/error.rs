//! Error types for the build-and-package pipeline.
//!
//! Every variant here is fatal: configuration and programmer errors abort the
//! pipeline immediately. Non-zero exits from external commands are *not*
//! errors; they travel as ordinary unsuccessful results (`bool`,
//! [`BuildOutcome::Failed`](crate::pipeline::BuildOutcome)).

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error.
#[derive(Debug, Error)]
pub enum Error {
    /// Free-form error, usually raised through [`bail!`](crate::bail).
    #[error("{0}")]
    GenericError(String),

    /// Raw I/O error without path context.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// I/O error with the operation and path that caused it.
    #[error("{context} ({}): {error}", path.display())]
    Fs {
        context: &'static str,
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The shell for an external command could not be spawned or awaited.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        command: String,
        #[source]
        error: std::io::Error,
    },

    /// An external command exceeded the configured timeout and was killed.
    #[error("`{command}` timed out after {timeout:?} and was terminated")]
    CommandTimedOut { command: String, timeout: Duration },

    #[error("source directory does not exist: {}", .0.display())]
    SourceDirectoryMissing(PathBuf),

    /// Configure succeeded but never printed a `Revision: SDL-` line.
    #[error(
        "configure step finished without reporting a version (no `Revision: SDL-` line); \
         packaging requires a version"
    )]
    VersionNotFound,

    #[error("invalid version `{0}`: expected major.minor[.build[.revision]]")]
    InvalidVersion(String),

    #[error("invalid dependency specification for platform `{platform}`: {reason}")]
    InvalidDependencySpec { platform: String, reason: String },

    #[error("built library not found at {}", .0.display())]
    LibraryNotFound(PathBuf),

    #[error("no artifacts matching `{pattern}` found in {}; nothing to publish", dir.display())]
    NoArtifacts { dir: PathBuf, pattern: String },

    /// Clearing this consolidation directory would delete the artifacts
    /// being consolidated or the working directory.
    #[error("refusing to clear consolidation directory {}: {reason}", output.display())]
    UnsafeOutputDirectory { output: PathBuf, reason: String },

    /// Archive entry that would be written outside the output directory.
    #[error("archive {} contains unsafe entry `{entry}`", archive.display())]
    UnsafeArchiveEntry { archive: PathBuf, entry: String },

    #[error("feed `{feed}` is missing required configuration: {}", missing.join(", "))]
    IncompleteFeedConfig {
        feed: String,
        missing: Vec<&'static str>,
    },

    #[error("zip error: {0}")]
    Zip(#[from] async_zip::error::ZipError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Attaches an operation description and path to I/O failures.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// `anyhow`-style context for missing values.
pub trait Context<T> {
    fn context<C: Display>(self, context: C) -> Result<T>;

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Returns early with [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::pipeline::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_feed_config_names_every_missing_field() {
        let err = Error::IncompleteFeedConfig {
            feed: "nuget".into(),
            missing: vec!["url", "apiKey"],
        };
        assert_eq!(
            err.to_string(),
            "feed `nuget` is missing required configuration: url, apiKey"
        );
    }

    #[test]
    fn fs_context_keeps_path() {
        let res: std::io::Result<()> = Err(std::io::Error::from(std::io::ErrorKind::NotFound));
        let err = res.fs_context("opening library", "/tmp/libSDL2.so").unwrap_err();
        assert!(err.to_string().contains("opening library (/tmp/libSDL2.so)"));
    }

    #[test]
    fn timeout_message_keeps_sub_second_precision() {
        let err = Error::CommandTimedOut {
            command: "sleep 30".into(),
            timeout: Duration::from_millis(300),
        };
        assert_eq!(
            err.to_string(),
            "`sleep 30` timed out after 300ms and was terminated"
        );
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let err = None::<u8>.context("nothing here").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "nothing here"));
    }
}
