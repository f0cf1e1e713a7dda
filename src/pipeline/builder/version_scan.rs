//! Version extraction from CMake configure output.
//!
//! SDL's CMake summary prints a line such as
//! `-- Revision: SDL-release-2.26.1-0-g6a6a3f5f4`. The text after `SDL-`
//! loses an optional `release-` prefix and everything from the next hyphen
//! on; what remains is parsed as a [`BuildVersion`].

use crate::pipeline::BuildVersion;

const REVISION_MARKER: &str = "Revision: SDL-";
const RELEASE_PREFIX: &str = "release-";

/// Extracts the version from a single output line, if it carries one.
///
/// Returns `None` for lines without the marker. A marker whose remainder is
/// not a dotted version is logged and also yields `None`.
pub fn extract_version(line: &str) -> Option<BuildVersion> {
    let (_, rest) = line.split_once(REVISION_MARKER)?;
    let rest = rest.trim();
    let rest = rest.strip_prefix(RELEASE_PREFIX).unwrap_or(rest);
    let candidate = rest.split('-').next().unwrap_or(rest);

    match candidate.parse() {
        Ok(version) => Some(version),
        Err(e) => {
            log::warn!("ignoring revision line {line:?}: {e}");
            None
        }
    }
}

/// Write-once holder for the configure-reported version.
///
/// Only the first well-formed revision line sets it; later ones are ignored.
#[derive(Debug, Default)]
pub struct VersionLatch {
    version: Option<BuildVersion>,
}

impl VersionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one output line.
    pub fn observe(&mut self, line: &str) {
        if self.version.is_some() {
            return;
        }
        if let Some(version) = extract_version(line) {
            log::info!("detected SDL version {version}");
            self.version = Some(version);
        }
    }

    pub fn version(&self) -> Option<BuildVersion> {
        self.version
    }
}
