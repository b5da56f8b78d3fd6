//! Configuration file support for umpkg.
//!
//! umpkg reads two configuration files:
//! - Global: `<config dir>/umpkg/config.toml` - User-wide defaults
//! - Project: `umpkg.toml` - Per-package settings, next to the spec files
//!
//! Project config takes precedence over global config, key by key.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::shim::{BackendConfig, BackendId};

/// Name of the project configuration file.
pub const PROJECT_CONFIG_NAME: &str = "umpkg.toml";

/// Default build tree, relative to the working directory.
pub const DEFAULT_RESULT_DIR: &str = "build";

/// Default GitLab instance hosting package sources.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.ultramarine-linux.org";

/// Default group holding one repository per package.
pub const DEFAULT_GITLAB_NAMESPACE: &str = "release/rpms";

/// umpkg configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Package settings
    pub package: PackageConfig,

    /// Build settings
    pub build: BuildConfig,

    /// Koji settings
    pub koji: KojiConfig,

    /// GitLab settings
    pub gitlab: GitlabConfig,
}

/// Package-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Whitespace-separated list of spec files built when no path is given
    pub spec: Option<String>,

    /// Directory holding one source directory per spec (empty = cwd)
    pub srcdir: Option<String>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build backend (rpmbuild, mock)
    pub backend: Option<String>,

    /// Mock chroot profile passed with `-r` (empty = mock default)
    pub mock_chroot: Option<String>,

    /// Build tree root for artifacts
    pub resultdir: Option<String>,
}

/// Koji-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KojiConfig {
    /// Koji client profile (`koji --profile`)
    pub profile: Option<String>,

    /// Default build target tag for `umpkg push`
    pub tag: Option<String>,

    /// Submit scratch builds by default
    pub scratch: Option<bool>,
}

/// GitLab-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitlabConfig {
    /// GitLab instance URL
    pub url: String,

    /// Group path containing package repositories
    pub namespace: String,
}

impl Default for GitlabConfig {
    fn default() -> Self {
        GitlabConfig {
            url: DEFAULT_GITLAB_URL.to_string(),
            namespace: DEFAULT_GITLAB_NAMESPACE.to_string(),
        }
    }
}

/// Treat empty strings as unset, the way hand-edited files express "nothing".
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create config directory: {}", parent.display())
                })?;
            }
        }

        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Defaults written to the global config by `umpkg setup`.
    ///
    /// Every key is spelled out so the generated file documents itself.
    pub fn template() -> Self {
        Config {
            package: PackageConfig {
                spec: Some(String::new()),
                srcdir: Some(String::new()),
            },
            build: BuildConfig {
                backend: Some(BackendId::Rpmbuild.to_string()),
                mock_chroot: Some(String::new()),
                resultdir: Some(DEFAULT_RESULT_DIR.to_string()),
            },
            koji: KojiConfig::default(),
            gitlab: GitlabConfig::default(),
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Package settings
        if other.package.spec.is_some() {
            self.package.spec = other.package.spec;
        }
        if other.package.srcdir.is_some() {
            self.package.srcdir = other.package.srcdir;
        }

        // Build settings
        if other.build.backend.is_some() {
            self.build.backend = other.build.backend;
        }
        if other.build.mock_chroot.is_some() {
            self.build.mock_chroot = other.build.mock_chroot;
        }
        if other.build.resultdir.is_some() {
            self.build.resultdir = other.build.resultdir;
        }

        // Koji settings
        if other.koji.profile.is_some() {
            self.koji.profile = other.koji.profile;
        }
        if other.koji.tag.is_some() {
            self.koji.tag = other.koji.tag;
        }
        if other.koji.scratch.is_some() {
            self.koji.scratch = other.koji.scratch;
        }

        // GitLab settings: only override when moved off the defaults
        let defaults = GitlabConfig::default();
        if other.gitlab.url != defaults.url {
            self.gitlab.url = other.gitlab.url;
        }
        if other.gitlab.namespace != defaults.namespace {
            self.gitlab.namespace = other.gitlab.namespace;
        }
    }

    /// The configured spec list, split on whitespace.
    pub fn spec_list(&self) -> Vec<String> {
        non_empty(&self.package.spec)
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Source directory override, if one is set.
    pub fn srcdir(&self) -> Option<&str> {
        non_empty(&self.package.srcdir)
    }

    /// Mock chroot profile, if one is set.
    pub fn mock_chroot(&self) -> Option<&str> {
        non_empty(&self.build.mock_chroot)
    }

    /// Parse the backend from the config string (defaults to rpmbuild).
    pub fn backend(&self) -> Result<BackendId> {
        match non_empty(&self.build.backend) {
            Some(s) => s
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid `build.backend` in config: {}", e)),
            None => Ok(BackendId::Rpmbuild),
        }
    }

    /// Build tree root, resolved against `cwd` when relative.
    pub fn result_dir(&self, cwd: &Path) -> PathBuf {
        let dir = non_empty(&self.build.resultdir).unwrap_or(DEFAULT_RESULT_DIR);
        cwd.join(dir)
    }

    /// Effective backend configuration for this working directory.
    pub fn backend_config(&self, cwd: &Path) -> BackendConfig {
        BackendConfig {
            chroot_profile: self.mock_chroot().map(str::to_string),
            result_dir: self.result_dir(cwd),
            source_dir_override: self.srcdir().map(|s| cwd.join(s)),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (umpkg.toml)
/// 2. Global config (<config dir>/umpkg/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
