//! Build targets and the results collected for them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::errors::BuildError;

/// Spec file extension appended to bare package names.
pub const SPEC_EXTENSION: &str = ".spec";

/// Append the spec extension unless the path already carries it.
pub fn normalize_spec_path(spec: &str) -> PathBuf {
    if spec.ends_with(SPEC_EXTENSION) {
        PathBuf::from(spec)
    } else {
        PathBuf::from(format!("{}{}", spec, SPEC_EXTENSION))
    }
}

/// One unit of work: a single spec file to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTarget {
    /// Normalized spec path, as requested (relative paths stay relative)
    pub spec_path: PathBuf,

    /// Source directory, filled in once resolution ran
    pub source_dir: Option<PathBuf>,
}

impl BuildTarget {
    /// Create a target from a requested spec identifier.
    pub fn new(spec: &str) -> Self {
        BuildTarget {
            spec_path: normalize_spec_path(spec),
            source_dir: None,
        }
    }

    /// Package name: the spec file name without its extension.
    pub fn name(&self) -> String {
        spec_stem(&self.spec_path)
    }
}

/// File name of a spec without any extension (`pkgs/foo.bar.spec` -> `foo`).
pub fn spec_stem(spec: &Path) -> String {
    let file_name = spec
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}

/// Final state of one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildStatus {
    /// Every requested stage produced its artifact
    Success,
    /// The spec file does not exist
    NotFound,
    /// The backend exited non-zero (or could not be started)
    BuildFailed,
    /// The backend succeeded but left no matching artifact
    NoArtifact,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildStatus::Success => "success",
            BuildStatus::NotFound => "not found",
            BuildStatus::BuildFailed => "build failed",
            BuildStatus::NoArtifact => "no artifact",
        };
        f.write_str(s)
    }
}

/// Result of processing one [`BuildTarget`]. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    target: BuildTarget,
    artifact: Option<PathBuf>,
    status: BuildStatus,
    message: Option<String>,
}

impl BuildOutcome {
    /// A target whose last stage produced `artifact`.
    pub fn success(target: BuildTarget, artifact: PathBuf) -> Self {
        BuildOutcome {
            target,
            artifact: Some(artifact),
            status: BuildStatus::Success,
            message: None,
        }
    }

    /// A target that stopped at `error`.
    pub fn failure(target: BuildTarget, error: &BuildError) -> Self {
        BuildOutcome {
            target,
            artifact: None,
            status: error.status(),
            message: Some(error.to_string()),
        }
    }

    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    /// Path of the newest artifact produced by the last stage that ran.
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    pub fn status(&self) -> BuildStatus {
        self.status
    }

    /// Human-readable failure reason.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.status == BuildStatus::Success
    }
}

/// Aggregate result of one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    /// Number of targets attempted
    pub total: usize,

    /// Number of targets with [`BuildStatus::Success`]
    pub succeeded: usize,

    /// Outcomes in completion order
    pub outcomes: Vec<BuildOutcome>,
}

impl BuildSummary {
    /// Build a summary from the collected outcomes.
    pub fn from_outcomes(total: usize, outcomes: Vec<BuildOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        BuildSummary {
            total,
            succeeded,
            outcomes,
        }
    }

    /// Whether every attempted target succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }

    /// Outcomes that did not succeed.
    pub fn failures(&self) -> impl Iterator<Item = &BuildOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Artifacts of successful targets.
    pub fn artifacts(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| o.artifact())
    }

    /// Find the outcome for a package name.
    pub fn outcome_for(&self, name: &str) -> Option<&BuildOutcome> {
        self.outcomes.iter().find(|o| o.target().name() == name)
    }
}
