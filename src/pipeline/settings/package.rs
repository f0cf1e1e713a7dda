//! Static metadata for the assembled package.

use serde::Deserialize;

/// Identity and description written into the `.nuspec`.
///
/// The version is not part of this struct: it comes from the version marker
/// in the consolidated tree.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageMetadata {
    /// Package identifier on the feed, e.g. `SDL2.Native`.
    pub id: String,

    /// Comma-separated author list.
    pub authors: String,

    pub description: String,

    /// Source repository URL.
    pub repository: String,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            id: "SDL2.Native".to_string(),
            authors: "Sam Lantinga, SDL contributors".to_string(),
            description: "Native SDL2 shared libraries for Windows, macOS and Linux runtimes."
                .to_string(),
            repository: "https://github.com/libsdl-org/SDL".to_string(),
        }
    }
}
