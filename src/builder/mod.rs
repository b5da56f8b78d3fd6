//! RPM build orchestration.
//!
//! This module turns a build request into per-spec build targets, resolves
//! their sources, runs them through the configured backend and collects the
//! outcomes into a summary.

pub mod artifact;
pub mod errors;
pub mod orchestrator;
pub mod outcome;
pub mod shim;
pub mod source_locator;

pub use artifact::{find_newest_artifact, ArtifactKind};
pub use errors::BuildError;
pub use orchestrator::{expand_request, BuildOrchestrator, BuildStage};
pub use outcome::{normalize_spec_path, BuildOutcome, BuildStatus, BuildSummary, BuildTarget};
pub use shim::{BackendConfig, BackendId, BackendRegistry, BackendShim};
pub use source_locator::SourceLocator;
