//! Direct backend shim - runs the host's `rpmbuild`.
//!
//! Every rpm build directory is redefined into the build tree, and
//! `_disable_source_fetch` is undefined so sources referenced by URL are
//! fetched when they were not staged locally.

use std::path::{Path, PathBuf};

use crate::builder::artifact::{find_binary_package, find_source_package};
use crate::builder::errors::BuildError;
use crate::builder::shim::backend_id::BackendId;
use crate::builder::shim::trait_def::*;
use crate::util::process::ProcessBuilder;

/// Direct backend shim.
pub struct RpmbuildShim {
    config: BackendConfig,
    program: PathBuf,
}

impl RpmbuildShim {
    /// Create a new rpmbuild shim.
    pub fn new(config: BackendConfig) -> Self {
        RpmbuildShim {
            config,
            program: PathBuf::from(BackendId::Rpmbuild.tool()),
        }
    }

    /// Use a different `rpmbuild` executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn base_command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
    }

    fn with_build_tree(&self, cmd: ProcessBuilder, source_dir: &Path) -> ProcessBuilder {
        cmd.define("_sourcedir", source_dir)
            .define("_srcrpmdir", self.config.srpm_dir())
            .define("_rpmdir", self.config.rpm_dir())
            .args(["--undefine", "_disable_source_fetch"])
    }

    pub(crate) fn source_command(&self, spec: &Path, source_dir: &Path) -> ProcessBuilder {
        let cmd = self.base_command().arg("-bs").arg(spec);
        self.with_build_tree(cmd, source_dir)
    }

    pub(crate) fn binary_command(&self, srpm: &Path) -> ProcessBuilder {
        let source_dir = srpm
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let cmd = self.base_command().arg("--rebuild").arg(srpm);
        self.with_build_tree(cmd, &source_dir)
    }
}

impl BackendShim for RpmbuildShim {
    fn id(&self) -> BackendId {
        BackendId::Rpmbuild
    }

    fn availability(&self) -> BackendAvailability {
        BackendAvailability::detect(self.id(), &self.program)
    }

    fn build_source_package(
        &self,
        spec: &Path,
        source_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        tracing::info!("Building source RPM from {}", source_dir.display());

        let cmd = self.source_command(spec, source_dir);
        run_stage(&cmd, &[self.config.srpm_dir()])?;

        find_source_package(&self.config.srpm_dir(), spec)
    }

    fn build_binary_package(&self, srpm: &Path) -> Result<PathBuf, BuildError> {
        tracing::info!("Building RPM from {}", srpm.display());

        let cmd = self.binary_command(srpm);
        run_stage(&cmd, &[self.config.rpm_dir()])?;

        find_binary_package(&self.config.rpm_dir(), srpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fake_tool, FAKE_RPMBUILD};
    use tempfile::TempDir;

    fn shim(result_dir: &Path) -> RpmbuildShim {
        RpmbuildShim::new(BackendConfig::new(result_dir))
    }

    #[test]
    fn test_source_command_arguments() {
        let cmd = shim(Path::new("/w/build"))
            .source_command(Path::new("/w/foo.spec"), Path::new("/src/foo"));

        assert_eq!(cmd.get_program(), Path::new("rpmbuild"));
        assert_eq!(
            cmd.get_args(),
            &[
                "-bs",
                "/w/foo.spec",
                "--define",
                "_sourcedir /src/foo",
                "--define",
                "_srcrpmdir /w/build/srpm",
                "--define",
                "_rpmdir /w/build/rpm",
                "--undefine",
                "_disable_source_fetch",
            ]
        );
    }

    #[test]
    fn test_binary_command_uses_srpm_directory_for_sources() {
        let cmd = shim(Path::new("/w/build"))
            .binary_command(Path::new("/w/build/srpm/foo-1.0-1.src.rpm"));

        let args = cmd.get_args();
        assert_eq!(args[0], "--rebuild");
        assert_eq!(args[1], "/w/build/srpm/foo-1.0-1.src.rpm");
        assert!(args.contains(&"_sourcedir /w/build/srpm".to_string()));
        assert!(args.contains(&"_disable_source_fetch".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_stages_with_fake_rpmbuild() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_tool(tmp.path(), "rpmbuild", FAKE_RPMBUILD);
        let spec = tmp.path().join("foo.spec");
        std::fs::write(&spec, "Name: foo\n").unwrap();

        let shim = shim(&tmp.path().join("build")).with_program(&tool);
        assert!(shim.availability().is_available());

        let srpm = shim.build_source_package(&spec, tmp.path()).unwrap();
        assert_eq!(srpm, tmp.path().join("build/srpm/foo-1.0-1.src.rpm"));

        let rpm = shim.build_binary_package(&srpm).unwrap();
        assert_eq!(rpm, tmp.path().join("build/rpm/x86_64/foo-1.0-1.x86_64.rpm"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_build_failed() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_tool(tmp.path(), "rpmbuild", "#!/bin/sh\nexit 1\n");
        let spec = tmp.path().join("foo.spec");
        std::fs::write(&spec, "").unwrap();

        let err = shim(&tmp.path().join("build"))
            .with_program(&tool)
            .build_source_package(&spec, tmp.path())
            .unwrap_err();
        assert!(matches!(err, BuildError::BackendInvocationFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_success_without_output_is_no_artifact() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_tool(tmp.path(), "rpmbuild", "#!/bin/sh\nexit 0\n");
        let spec = tmp.path().join("foo.spec");
        std::fs::write(&spec, "").unwrap();

        let err = shim(&tmp.path().join("build"))
            .with_program(&tool)
            .build_source_package(&spec, tmp.path())
            .unwrap_err();
        assert!(matches!(err, BuildError::ArtifactNotLocated { .. }));
    }
}
