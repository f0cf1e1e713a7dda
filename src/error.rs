//! Top-level error types for the packager binary.

use thiserror::Error;

/// Result type alias for command-line operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type surfaced by the command-line entry point
#[derive(Error, Debug)]
pub enum PackagerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline errors
    #[error("{0}")]
    Pipeline(#[from] crate::pipeline::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// A file named on the command line does not exist
    #[error("{argument} file not found: {path}")]
    MissingFile {
        /// Flag that named the file
        argument: &'static str,
        /// Path as given
        path: String,
    },
}
