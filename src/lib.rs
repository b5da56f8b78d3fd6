//! umpkg - packaging automation for RPM-based distributions
//!
//! This crate provides the library behind the `umpkg` CLI: build
//! orchestration over `rpmbuild` and `mock`, project configuration, and
//! the Koji and GitLab helpers.

pub mod builder;
pub mod ops;
pub mod util;

/// Test utilities and mocks for umpkg unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a stub build backend and fixtures for spec
/// files and fake build tools.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildOrchestrator, BuildOutcome, BuildStage, BuildStatus, BuildSummary};
pub use util::config::Config;
pub use util::context::GlobalContext;
