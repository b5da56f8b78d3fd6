//! Implementation of `umpkg push`: build source packages and submit them to Koji.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::BuildStage;
use crate::ops::umpkg_build::{build_with_config, BuildOptions};
use crate::util::config::KojiConfig;
use crate::util::{GlobalContext, ProcessBuilder};

/// Options for `umpkg push`.
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Koji build tag; falls back to `koji.tag`
    pub tag: Option<String>,

    /// Spec to push; `None` pushes every spec in `package.spec`
    pub path: Option<String>,

    /// Submit a scratch build
    pub scratch: bool,

    /// Do not wait for the Koji task to finish
    pub nowait: bool,
}

/// Build the `koji build` command for one source package.
pub fn koji_command(
    koji: &KojiConfig,
    tag: &str,
    srpm: &Path,
    scratch: bool,
    nowait: bool,
) -> ProcessBuilder {
    let mut cmd = ProcessBuilder::new("koji");
    if let Some(profile) = koji.profile.as_deref().filter(|p| !p.trim().is_empty()) {
        cmd = cmd.arg("--profile").arg(profile);
    }
    cmd = cmd.arg("build");
    if scratch || koji.scratch.unwrap_or(false) {
        cmd = cmd.arg("--scratch");
    }
    if nowait {
        cmd = cmd.arg("--nowait");
    }
    cmd.arg(tag).arg(srpm)
}

/// Build the requested source packages, then submit each one to Koji.
///
/// Nothing is submitted unless every source package built.
pub fn push(ctx: &GlobalContext, opts: &PushOptions) -> Result<Vec<PathBuf>> {
    let config = ctx.load_config();

    let tag = opts
        .tag
        .clone()
        .or_else(|| config.koji.tag.clone())
        .filter(|t| !t.trim().is_empty())
        .with_context(|| "no Koji tag given\nhint: pass one or set `koji.tag` in umpkg.toml")?;

    let build_opts = BuildOptions::new(opts.path.clone(), BuildStage::SourceOnly);
    let summary = build_with_config(ctx, &config, &build_opts)?;

    if !summary.all_succeeded() {
        bail!(
            "{} of {} source packages failed to build, nothing was pushed",
            summary.total - summary.succeeded,
            summary.total
        );
    }

    let srpms: Vec<PathBuf> = summary.artifacts().map(Path::to_path_buf).collect();
    for srpm in &srpms {
        let cmd = koji_command(&config.koji, &tag, srpm, opts.scratch, opts.nowait);
        tracing::info!("Pushing {} to {}", srpm.display(), tag);
        tracing::debug!("Running: {}", cmd.display_command());

        let status = cmd.status()?;
        if !status.success() {
            bail!("`{}` failed with {}", cmd.display_command(), status);
        }
    }

    Ok(srpms)
}
