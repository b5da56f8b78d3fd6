//! umpkg CLI - packaging automation for RPM-based distributions

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("umpkg=debug")
    } else {
        EnvFilter::new("umpkg=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match cli.command {
        Commands::Build(args) => commands::build::execute(args),
        Commands::Buildsrc(args) => commands::buildsrc::execute(args),
        Commands::Version => commands::version::execute(),
        Commands::Init(args) => commands::init::execute(args),
        Commands::Setup => commands::setup::execute(),
        Commands::Get(args) => commands::get::execute(args),
        Commands::Push(args) => commands::push::execute(args),
    }
}
