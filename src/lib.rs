//! Build-and-package pipeline for the SDL2 native runtime.
//!
//! This library provides:
//! - per-platform CMake builds of the SDL2 shared library
//! - per-runtime artifact archives (`artifact-<rid>.zip`)
//! - consolidation of every platform's artifact into one NuGet package
//!   and the push to a package feed
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use error::{CliError, PackagerError, Result};
