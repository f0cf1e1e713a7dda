//! Embedded package resources.

/// `.nuspec` manifest. Rendered with HTML escaping, which is also valid XML
/// escaping for the interpolated values.
pub const NUSPEC_TEMPLATE: &str = include_str!("../../../resources/package.nuspec.hbs");

/// OPC content types required at the root of a `.nupkg`.
pub const CONTENT_TYPES: &str = include_str!("../../../resources/content_types.xml");

/// README shipped inside the package.
pub const README: &str = include_str!("../../../resources/README.md");
