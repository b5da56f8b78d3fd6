//! Resolution of the directory holding a package's build sources.

use std::path::{Path, PathBuf};

use crate::builder::outcome::spec_stem;
use crate::builder::shim::BackendConfig;
use crate::util::GlobalContext;

/// Resolves source directories with an ordered fallback policy:
///
/// 1. `<override>/<package name>` when a source directory override is set
///    and that directory exists,
/// 2. the per-user default (`~/rpmbuild/SOURCES`) when the override is set
///    but the package directory is missing,
/// 3. the working directory when no override is set.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    source_dir_override: Option<PathBuf>,
    cwd: PathBuf,
    default_dir: PathBuf,
}

impl SourceLocator {
    /// Create a locator.
    pub fn new(
        source_dir_override: Option<PathBuf>,
        cwd: impl Into<PathBuf>,
        default_dir: impl Into<PathBuf>,
    ) -> Self {
        SourceLocator {
            source_dir_override: source_dir_override.filter(|p| !p.as_os_str().is_empty()),
            cwd: cwd.into(),
            default_dir: default_dir.into(),
        }
    }

    /// Create a locator from the effective backend configuration.
    pub fn from_config(config: &BackendConfig, ctx: &GlobalContext) -> Self {
        SourceLocator::new(
            config.source_dir_override.clone(),
            ctx.cwd(),
            ctx.default_sources_dir(),
        )
    }

    /// Resolve the source directory for `spec`. Never fails.
    ///
    /// The returned directory is not guaranteed to exist; the build tool
    /// reports missing sources itself.
    pub fn resolve(&self, spec: &Path) -> PathBuf {
        let Some(ref base) = self.source_dir_override else {
            return self.cwd.clone();
        };

        let candidate = base.join(spec_stem(spec));
        if candidate.is_dir() {
            candidate
        } else {
            tracing::warn!(
                "{} not found, using {}",
                candidate.display(),
                self.default_dir.display()
            );
            self.default_dir.clone()
        }
    }
}
