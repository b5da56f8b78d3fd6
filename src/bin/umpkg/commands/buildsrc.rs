//! `umpkg buildsrc` command

use anyhow::Result;

use crate::cli::BuildArgs;
use umpkg::builder::BuildStage;

pub fn execute(args: BuildArgs) -> Result<()> {
    super::build::run(args, BuildStage::SourceOnly)
}
