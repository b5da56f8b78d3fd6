//! Isolated backend shim - builds inside a `mock` chroot.

use std::path::{Path, PathBuf};

use crate::builder::artifact::{find_binary_package, find_source_package};
use crate::builder::errors::BuildError;
use crate::builder::shim::backend_id::BackendId;
use crate::builder::shim::trait_def::*;
use crate::util::process::ProcessBuilder;

/// Isolated backend shim.
pub struct MockShim {
    config: BackendConfig,
    program: PathBuf,
}

impl MockShim {
    /// Create a new mock shim.
    pub fn new(config: BackendConfig) -> Self {
        MockShim {
            config,
            program: PathBuf::from(BackendId::Mock.tool()),
        }
    }

    /// Use a different `mock` executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn with_chroot(&self, cmd: ProcessBuilder) -> ProcessBuilder {
        match self.config.chroot_profile {
            Some(ref profile) => cmd.arg("-r").arg(profile),
            None => cmd,
        }
    }

    pub(crate) fn source_command(&self, spec: &Path, source_dir: &Path) -> ProcessBuilder {
        let cmd = ProcessBuilder::new(&self.program)
            .arg("--buildsrpm")
            .arg("--spec")
            .arg(spec)
            .arg("--sources")
            .arg(source_dir)
            .arg("--resultdir")
            .arg(self.config.srpm_dir());
        self.with_chroot(cmd)
    }

    /// Chain mode rebuilds into a local repository in one mock invocation.
    pub(crate) fn binary_command(&self, srpm: &Path) -> ProcessBuilder {
        let cmd = ProcessBuilder::new(&self.program)
            .arg("--rebuild")
            .arg(srpm)
            .arg("--chain")
            .arg("--localrepo")
            .arg(self.config.repo_dir());
        self.with_chroot(cmd)
    }
}

impl BackendShim for MockShim {
    fn id(&self) -> BackendId {
        BackendId::Mock
    }

    fn availability(&self) -> BackendAvailability {
        BackendAvailability::detect(self.id(), &self.program)
    }

    fn build_source_package(
        &self,
        spec: &Path,
        source_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        tracing::info!(
            "Building source RPM in {} from {}",
            self.config.chroot_profile.as_deref().unwrap_or("default chroot"),
            source_dir.display()
        );

        let cmd = self.source_command(spec, source_dir);
        run_stage(&cmd, &[self.config.srpm_dir()])?;

        find_source_package(&self.config.srpm_dir(), spec)
    }

    fn build_binary_package(&self, srpm: &Path) -> Result<PathBuf, BuildError> {
        tracing::info!("Rebuilding {} with mock", srpm.display());

        let cmd = self.binary_command(srpm);
        run_stage(&cmd, &[self.config.repo_dir()])?;

        find_binary_package(&self.config.repo_dir(), srpm)
    }
}
