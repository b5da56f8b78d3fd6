//! Test utilities and mocks for umpkg unit tests.
//!
//! Provides a stub [`BackendShim`] that records calls instead of running
//! build tools, and fixtures for spec files, fake tool scripts and file
//! modification times.
//!
//! # Example
//!
//! ```rust,ignore
//! use umpkg::test_support::{write_spec, StubBehavior, StubShim};
//!
//! #[test]
//! fn test_example() {
//!     let tmp = tempfile::TempDir::new().unwrap();
//!     write_spec(tmp.path(), "foo");
//!     let shim = Arc::new(StubShim::new(StubBehavior::Succeed));
//!     // Hand the shim to a BuildOrchestrator...
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, SystemTime};

use crate::builder::errors::BuildError;
use crate::builder::outcome::spec_stem;
use crate::builder::shim::{BackendAvailability, BackendId, BackendShim};

/// What a [`StubShim`] does when asked to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubBehavior {
    /// Both stages succeed
    Succeed,
    /// The source stage exits non-zero
    FailSource,
    /// The binary stage exits non-zero
    FailBinary,
    /// The binary stage succeeds but leaves no package behind
    NoBinaryArtifact,
}

/// Backend that fabricates artifact paths without touching the filesystem.
#[derive(Debug)]
pub struct StubShim {
    behavior: StubBehavior,
    delay: Duration,
    source_calls: AtomicUsize,
    binary_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubShim {
    /// Create a stub with the given behavior.
    pub fn new(behavior: StubBehavior) -> Self {
        StubShim {
            behavior,
            delay: Duration::ZERO,
            source_calls: AtomicUsize::new(0),
            binary_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Make each source stage take at least `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of source stages started.
    pub fn source_calls(&self) -> usize {
        self.source_calls.load(Ordering::SeqCst)
    }

    /// Number of binary stages started.
    pub fn binary_calls(&self) -> usize {
        self.binary_calls.load(Ordering::SeqCst)
    }

    /// Highest number of source stages observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl BackendShim for StubShim {
    fn id(&self) -> BackendId {
        BackendId::Rpmbuild
    }

    fn availability(&self) -> BackendAvailability {
        BackendAvailability::Available {
            path: PathBuf::from("/usr/bin/true"),
        }
    }

    fn build_source_package(
        &self,
        spec: &Path,
        _source_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        self.source_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.behavior == StubBehavior::FailSource {
            return Err(BuildError::invocation(
                format!("rpmbuild -bs {}", spec.display()),
                "exit code 1",
            ));
        }
        Ok(PathBuf::from(format!("build/srpm/{}-1.0-1.src.rpm", spec_stem(spec))))
    }

    fn build_binary_package(&self, srpm: &Path) -> Result<PathBuf, BuildError> {
        self.binary_calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            StubBehavior::FailBinary => Err(BuildError::invocation(
                format!("rpmbuild --rebuild {}", srpm.display()),
                "exit code 1",
            )),
            StubBehavior::NoBinaryArtifact => Err(BuildError::ArtifactNotLocated {
                dir: PathBuf::from("build/rpm"),
                pattern: "**/*.rpm".to_string(),
            }),
            StubBehavior::Succeed | StubBehavior::FailSource => {
                let file = srpm
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let nvr = file.trim_end_matches(".src.rpm");
                Ok(PathBuf::from(format!("build/rpm/x86_64/{}.x86_64.rpm", nvr)))
            }
        }
    }
}

/// Write a minimal `<name>.spec` into `dir`.
pub fn write_spec(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(format!("{}.spec", name));
    let contents = format!(
        "Name: {name}\nVersion: 1.0\nRelease: 1\nSummary: {name}\nLicense: MIT\n\n%description\n{name}\n"
    );
    std::fs::write(&path, contents).unwrap();
    path
}

/// Create (or truncate) `path` and set its mtime to `secs` after the epoch.
pub fn touch_at(path: &Path, secs: u64) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"").unwrap();
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

/// Install an executable script named `name` in `dir`.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = dir.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let path = bin.join(name);
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A fake `rpmbuild` that honors `-bs`/`--rebuild` and the output dir defines.
///
/// Shared with `tests/cli_integration.rs`, which cannot see this module.
pub const FAKE_RPMBUILD: &str = include_str!("../../tests/fixtures/fake-rpmbuild.sh");

/// A fake `rpmbuild` where package `slow` finishes after its siblings wrote
/// their output.
pub const STAGGERED_RPMBUILD: &str =
    include_str!("../../tests/fixtures/staggered-rpmbuild.sh");
