//! Per-target build errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::builder::outcome::BuildStatus;

/// Why a single build target did not produce its artifact.
///
/// These never abort a batch: the orchestrator turns each one into a
/// [`BuildStatus`] on that target's outcome.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("spec file `{}` not found", path.display())]
    SpecNotFound { path: PathBuf },

    #[error("`{command}` failed: {reason}")]
    BackendInvocationFailed { command: String, reason: String },

    #[error("no artifact matching `{pattern}` found in `{}`", dir.display())]
    ArtifactNotLocated { dir: PathBuf, pattern: String },
}

impl BuildError {
    /// The outcome status this error maps to.
    pub fn status(&self) -> BuildStatus {
        match self {
            BuildError::SpecNotFound { .. } => BuildStatus::NotFound,
            BuildError::BackendInvocationFailed { .. } => BuildStatus::BuildFailed,
            BuildError::ArtifactNotLocated { .. } => BuildStatus::NoArtifact,
        }
    }

    pub(crate) fn invocation(command: impl Into<String>, reason: impl Into<String>) -> Self {
        BuildError::BackendInvocationFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }
}
