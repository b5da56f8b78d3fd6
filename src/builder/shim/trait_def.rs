//! BackendShim trait definition and shared types.
//!
//! A backend runs the two build stages against an external tool and
//! reports the artifact it produced. Failures come back as [`BuildError`]
//! values, never as panics or process exits.

use std::path::{Path, PathBuf};

use crate::builder::errors::BuildError;
use crate::builder::shim::backend_id::BackendId;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_executable, ProcessBuilder};

/// Backend availability status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendAvailability {
    /// Backend tool is available and ready
    Available {
        /// Resolved path of the tool
        path: PathBuf,
    },

    /// Backend tool is not installed
    NotInstalled {
        /// Name of the missing tool (e.g., "mock")
        tool: String,
        /// Hint for how to install (e.g., "dnf install mock")
        install_hint: String,
    },
}

impl BackendAvailability {
    /// Look up `id`'s tool (or an explicit program path) on this host.
    pub fn detect(id: BackendId, program: &Path) -> Self {
        let found = if program.components().count() > 1 {
            program.is_file().then(|| program.to_path_buf())
        } else {
            find_executable(&program.to_string_lossy())
        };

        match found {
            Some(path) => BackendAvailability::Available { path },
            None => BackendAvailability::NotInstalled {
                tool: id.tool().to_string(),
                install_hint: id.install_hint().to_string(),
            },
        }
    }

    /// Check if the backend is available.
    pub fn is_available(&self) -> bool {
        matches!(self, BackendAvailability::Available { .. })
    }

    /// Get error message if not available.
    pub fn error_message(&self) -> Option<String> {
        match self {
            BackendAvailability::Available { .. } => None,
            BackendAvailability::NotInstalled { tool, install_hint } => {
                Some(format!("{} not found. hint: {}", tool, install_hint))
            }
        }
    }
}

/// Effective configuration a backend is constructed with. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Isolated build environment name (`mock -r`)
    pub chroot_profile: Option<String>,

    /// Build tree root receiving all artifacts
    pub result_dir: PathBuf,

    /// Directory holding one source directory per package
    pub source_dir_override: Option<PathBuf>,
}

impl BackendConfig {
    /// Create a configuration writing into `result_dir`.
    pub fn new(result_dir: impl Into<PathBuf>) -> Self {
        BackendConfig {
            chroot_profile: None,
            result_dir: result_dir.into(),
            source_dir_override: None,
        }
    }

    /// Set the chroot profile.
    pub fn with_chroot_profile(mut self, profile: impl Into<String>) -> Self {
        self.chroot_profile = Some(profile.into());
        self
    }

    /// Set the source directory override.
    pub fn with_source_dir_override(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir_override = Some(dir.into());
        self
    }

    /// Source packages land here.
    pub fn srpm_dir(&self) -> PathBuf {
        self.result_dir.join("srpm")
    }

    /// Direct binary packages land here (in per-arch subdirectories).
    pub fn rpm_dir(&self) -> PathBuf {
        self.result_dir.join("rpm")
    }

    /// Local repository used by chained isolated rebuilds.
    pub fn repo_dir(&self) -> PathBuf {
        self.result_dir.join("repo")
    }
}

/// Interface implemented by every build backend.
///
/// Implementations hold their [`BackendConfig`] from construction and are
/// shared across concurrently running build tasks.
pub trait BackendShim: Send + Sync {
    /// Which backend this is.
    fn id(&self) -> BackendId;

    /// Whether the backend's tool can be found on this host.
    fn availability(&self) -> BackendAvailability;

    /// Build a source package from `spec`, with sources staged in `source_dir`.
    ///
    /// Returns the newest `*.src.rpm` in the source package directory.
    fn build_source_package(&self, spec: &Path, source_dir: &Path)
        -> Result<PathBuf, BuildError>;

    /// Build binary packages from a source package.
    ///
    /// Returns the newest binary `*.rpm` the backend produced.
    fn build_binary_package(&self, srpm: &Path) -> Result<PathBuf, BuildError>;
}

/// Run one stage command synchronously, mapping failure to [`BuildError`].
///
/// The command is never retried.
pub(crate) fn run_stage(cmd: &ProcessBuilder, output_dirs: &[PathBuf]) -> Result<(), BuildError> {
    let command = cmd.display_command();

    for dir in output_dirs {
        ensure_dir(dir).map_err(|e| BuildError::invocation(&command, format!("{:#}", e)))?;
    }

    tracing::debug!("Running `{}`", command);

    let status = cmd
        .status()
        .map_err(|e| BuildError::invocation(&command, format!("{:#}", e)))?;

    if !status.success() {
        let reason = match status.code() {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        return Err(BuildError::invocation(command, reason));
    }

    Ok(())
}
