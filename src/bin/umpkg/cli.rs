//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};

/// umpkg - build, fetch and push RPM packages
#[derive(Parser)]
#[command(name = "umpkg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build source and binary packages
    Build(BuildArgs),

    /// Build source packages only
    Buildsrc(BuildArgs),

    /// Print version and copyright information
    Version,

    /// Initialize an umpkg project in the current directory
    Init(InitArgs),

    /// Check for packaging tools and write the global config
    Setup,

    /// Clone a package repository
    Get(GetArgs),

    /// Build source packages and submit them to Koji
    Push(PushArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Spec file to build (defaults to every spec in `package.spec`)
    pub path: Option<String>,

    /// Print the build summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// Create a new spec file with rpmdev-newspec
    #[arg(long)]
    pub spec: Option<String>,

    /// Overwrite an existing umpkg.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct GetArgs {
    /// Package name
    pub name: String,

    /// Branch to check out
    #[arg(short, long)]
    pub branch: Option<String>,
}

#[derive(Args)]
pub struct PushArgs {
    /// Koji build tag (defaults to `koji.tag`)
    pub tag: Option<String>,

    /// Spec file to push (defaults to every spec in `package.spec`)
    #[arg(long)]
    pub spec: Option<String>,

    /// Submit a scratch build
    #[arg(long)]
    pub scratch: bool,

    /// Do not wait for the build task to finish
    #[arg(long)]
    pub nowait: bool,
}
