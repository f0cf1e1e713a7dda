//! Pipeline configuration.
//!
//! A [`Settings`] value is built once at process start (defaults, then an
//! optional JSON settings file, then explicit overrides) and is immutable
//! afterwards. Components receive it by reference.

mod builder;
mod core;
mod feed;
mod file;
mod package;

pub use builder::SettingsBuilder;
pub use core::Settings;
pub use feed::{FeedConfig, ValidatedFeed};
pub use file::SettingsFile;
pub use package::PackageMetadata;
