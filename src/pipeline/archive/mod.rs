//! Per-platform artifact archives.
//!
//! An artifact is `artifact-{rid}.zip` with exactly two entries: the version
//! marker and `runtimes/{rid}/<library>`. File contents move through a fixed
//! [`COPY_BUFFER_SIZE`] buffer in both directions, so memory stays bounded
//! regardless of library size.
//!
//! # Module Organization
//!
//! - [`packager`] - writes one platform's artifact
//! - [`consolidator`] - expands every artifact into one shared tree
//! - `writer` - streaming zip writer shared with package assembly
//! - [`checksum`] - SHA-256 of finished archives

mod checksum;
mod consolidator;
mod packager;
pub(crate) mod writer;

pub use checksum::calculate_sha256;
pub use consolidator::{
    ARTIFACT_PATTERN, Consolidation, consolidate, discover_artifacts, read_version_marker,
};
pub use packager::{PackagedArtifact, library_entry_name, package_artifact};

/// Read/write buffer for streaming file contents.
pub const COPY_BUFFER_SIZE: usize = 8192;
