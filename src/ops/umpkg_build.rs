//! Implementation of `umpkg build` and `umpkg buildsrc`.

use anyhow::{bail, Result};

use crate::builder::{BackendRegistry, BuildOrchestrator, BuildStage, BuildSummary, SourceLocator};
use crate::util::{Config, GlobalContext};

/// Options for the build commands.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Spec to build; `None` builds every spec listed in `package.spec`
    pub path: Option<String>,

    /// Stop after the source package, or build binaries too
    pub stage: BuildStage,
}

impl BuildOptions {
    /// Build one spec (or the configured list) through `stage`.
    pub fn new(path: Option<String>, stage: BuildStage) -> Self {
        BuildOptions { path, stage }
    }

    /// Whether this is a fan-out over the configured spec list.
    pub fn is_batch(&self) -> bool {
        self.path.is_none()
    }
}

/// Build with the configuration found from `ctx`.
pub fn build(ctx: &GlobalContext, opts: &BuildOptions) -> Result<BuildSummary> {
    let config = ctx.load_config();
    build_with_config(ctx, &config, opts)
}

/// Build with an already resolved configuration.
pub fn build_with_config(
    ctx: &GlobalContext,
    config: &Config,
    opts: &BuildOptions,
) -> Result<BuildSummary> {
    if opts.is_batch() && config.spec_list().is_empty() {
        bail!(
            "no spec file given and `package.spec` is empty\n\
             hint: pass a spec path or set `spec` in {}",
            ctx.project_config_path().display()
        );
    }

    let backend_id = config.backend()?;
    let backend_config = config.backend_config(ctx.cwd());
    let registry = BackendRegistry::new(&backend_config);
    let backend = registry
        .get(backend_id)
        .ok_or_else(|| anyhow::anyhow!("unknown backend: {}", backend_id))?;

    if let Some(message) = backend.availability().error_message() {
        tracing::warn!("{}", message);
    }
    tracing::debug!("Using {} backend", backend_id);

    let locator = SourceLocator::from_config(&backend_config, ctx);
    let orchestrator = BuildOrchestrator::new(backend, locator, ctx.cwd());

    Ok(orchestrator.run(opts.path.as_deref(), config, opts.stage))
}

/// Turn a summary into the command's exit status.
///
/// A directly requested build fails the command when it did not succeed.
/// A fan-out over the configured list only reports how many packages built.
pub fn check_summary(summary: &BuildSummary, opts: &BuildOptions) -> Result<()> {
    if opts.is_batch() {
        tracing::info!("Built {} packages specified in config.", summary.succeeded);
        for failed in summary.failures() {
            tracing::warn!(
                "{}: {}",
                failed.target().spec_path.display(),
                failed.message().unwrap_or("failed")
            );
        }
        return Ok(());
    }

    match summary.failures().next() {
        Some(failed) => bail!(
            "{}",
            failed
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} failed", failed.target().spec_path.display()))
        ),
        None => Ok(()),
    }
}
