//! CMake build orchestration.
//!
//! Two phases: configure (scanned for the SDL revision line to learn the
//! version) and compile. Non-zero exits are reported as
//! [`BuildOutcome::Failed`], never as errors.
//!
//! # Module Organization
//!
//! - [`orchestrator`] - [`BuildOrchestrator`] and command construction
//! - [`version_scan`] - the write-once [`VersionLatch`]
//! - [`tool_detection`] - CMake availability check

mod orchestrator;
mod tool_detection;
mod version_scan;

pub use orchestrator::{BuildOrchestrator, BuildOutcome, BuildPhase};
pub use version_scan::{VersionLatch, extract_version};
