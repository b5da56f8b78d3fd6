//! `umpkg build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use umpkg::builder::BuildStage;
use umpkg::ops::umpkg_build::{build, check_summary, BuildOptions};
use umpkg::util::GlobalContext;

pub fn execute(args: BuildArgs) -> Result<()> {
    run(args, BuildStage::Full)
}

/// Shared by `build` and `buildsrc`.
pub(crate) fn run(args: BuildArgs, stage: BuildStage) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let opts = BuildOptions::new(args.path, stage);

    let summary = build(&ctx, &opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    check_summary(&summary, &opts)
}
