//! Implementation of `umpkg init`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::util::config::PROJECT_CONFIG_NAME;
use crate::util::fs::write_string;
use crate::util::ProcessBuilder;

/// Entries every package repository should ignore.
pub const GITIGNORE_ENTRIES: &[&str] = &["*.rpm", "*.src.rpm", "*.log", "build/", ".tar.*"];

/// Options for `umpkg init`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Create `<name>.spec` with `rpmdev-newspec` and record it in the config
    pub spec: Option<String>,

    /// Overwrite an existing `umpkg.toml`
    pub force: bool,
}

/// Generate the project config file contents.
pub fn generate_project_config(spec: &str) -> String {
    format!(
        r#"[package]
# Space-separated spec files built when no path is given
spec = "{spec}"
# Directory holding one source directory per package
# srcdir = "sources"

[build]
# backend = "mock"
# mock_chroot = "ultramarine-37-x86_64"
# resultdir = "build"
"#
    )
}

/// Initialize an umpkg project in `path`.
pub fn init_project(path: &Path, opts: &InitOptions) -> Result<()> {
    let config_path = path.join(PROJECT_CONFIG_NAME);
    if config_path.exists() && !opts.force {
        bail!(
            "`{}` already exists in `{}`\n\
             \n\
             Use `umpkg init --force` to overwrite it.",
            PROJECT_CONFIG_NAME,
            path.display()
        );
    }

    let spec = match &opts.spec {
        Some(name) => {
            let spec_file = format!("{}.spec", name.trim_end_matches(".spec"));
            if !path.join(&spec_file).exists() {
                ProcessBuilder::new("rpmdev-newspec")
                    .arg(&spec_file)
                    .cwd(path)
                    .exec_and_check()
                    .with_context(|| format!("failed to create {}", spec_file))?;
            }
            spec_file
        }
        None => String::new(),
    };

    write_string(&config_path, &generate_project_config(&spec))?;

    update_gitignore(path)?;

    tracing::info!("Initialized umpkg project in {}", path.display());
    Ok(())
}

/// Append the missing ignore entries, creating `.gitignore` if needed.
fn update_gitignore(path: &Path) -> Result<()> {
    let gitignore = path.join(".gitignore");
    let existing = if gitignore.exists() {
        fs::read_to_string(&gitignore).with_context(|| "failed to read .gitignore")?
    } else {
        String::new()
    };

    let missing: Vec<&str> = GITIGNORE_ENTRIES
        .iter()
        .copied()
        .filter(|entry| !existing.lines().any(|line| line.trim() == *entry))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let mut contents = existing;
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    for entry in missing {
        contents.push_str(entry);
        contents.push('\n');
    }

    write_string(&gitignore, &contents)
}
