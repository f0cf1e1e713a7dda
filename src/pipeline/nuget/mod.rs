//! NuGet package assembly and feed publishing.
//!
//! # Module Organization
//!
//! - `template` - embedded `.nuspec`, content-types and README resources
//! - [`assemble`] - builds the `.nupkg` from the consolidated tree
//! - [`feed`] - the [`PackageFeed`] seam and its HTTP implementation

mod assemble;
mod feed;
mod template;

pub use assemble::{assemble_package, package_file_name, render_nuspec};
pub use feed::{NuGetFeed, PackageFeed};
