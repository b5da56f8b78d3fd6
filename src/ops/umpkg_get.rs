//! Implementation of `umpkg get`: clone a package repository.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use git2::build::RepoBuilder;
use url::Url;

use crate::util::config::GitlabConfig;
use crate::util::GlobalContext;

/// Options for `umpkg get`.
#[derive(Debug, Clone)]
pub struct GetOptions {
    /// Package (repository) name
    pub name: String,

    /// Branch to check out instead of the remote default
    pub branch: Option<String>,
}

/// Remote URL of a package repository: `<url>/<namespace>/<name>.git`.
pub fn repo_url(gitlab: &GitlabConfig, name: &str) -> Result<Url> {
    let base = gitlab.url.trim_end_matches('/');
    let namespace = gitlab.namespace.trim_matches('/');

    let raw = if namespace.is_empty() {
        format!("{}/{}.git", base, name)
    } else {
        format!("{}/{}/{}.git", base, namespace, name)
    };

    Url::parse(&raw).with_context(|| format!("invalid repository url: {}", raw))
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("package name cannot be empty");
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        bail!("invalid package name `{}`", name);
    }
    Ok(())
}

/// Clone a package repository into `<cwd>/<name>`.
pub fn get(ctx: &GlobalContext, opts: &GetOptions) -> Result<PathBuf> {
    validate_name(&opts.name)?;

    let dest = ctx.cwd().join(&opts.name);
    if dest.exists() {
        bail!("destination `{}` already exists", dest.display());
    }

    let config = ctx.load_config();
    let url = repo_url(&config.gitlab, &opts.name)?;

    tracing::info!("Cloning {}", url);

    let mut builder = RepoBuilder::new();
    if let Some(branch) = &opts.branch {
        builder.branch(branch);
    }
    builder
        .clone(url.as_str(), &dest)
        .with_context(|| format!("failed to clone {}", url))?;

    Ok(dest)
}
