//! Global context for umpkg operations.
//!
//! Provides centralized access to the working directory, configuration
//! locations and the per-user rpm build tree.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};

use crate::util::config::{load_config, Config, PROJECT_CONFIG_NAME};

/// Project directories for umpkg
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("org", "ultramarine", "umpkg"));

/// Global context containing paths used by every command.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Directory holding the global config file
    config_dir: PathBuf,

    /// Home directory of the invoking user
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process environment.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext rooted at a specific directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let home = BaseDirs::new()
            .map(|b| b.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let config_dir = match PROJECT_DIRS.as_ref() {
            Some(dirs) => dirs.config_dir().to_path_buf(),
            None => home.join(".config").join("umpkg"),
        };

        GlobalContext {
            cwd,
            config_dir,
            home,
        }
    }

    /// Override the global config directory.
    pub fn with_config_dir(mut self, config_dir: PathBuf) -> Self {
        self.config_dir = config_dir;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Path to the global config file.
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Path to the project config file in the working directory.
    pub fn project_config_path(&self) -> PathBuf {
        self.cwd.join(PROJECT_CONFIG_NAME)
    }

    /// The per-user rpm sources directory (`~/rpmbuild/SOURCES`).
    pub fn default_sources_dir(&self) -> PathBuf {
        self.home.join("rpmbuild").join("SOURCES")
    }

    /// Load the merged global + project configuration.
    pub fn load_config(&self) -> Config {
        load_config(&self.config_path(), &self.project_config_path())
    }
}
