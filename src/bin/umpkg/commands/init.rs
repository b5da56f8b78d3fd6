//! `umpkg init` command

use anyhow::Result;

use crate::cli::InitArgs;
use umpkg::ops::umpkg_init::{init_project, InitOptions};
use umpkg::util::GlobalContext;

pub fn execute(args: InitArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let opts = InitOptions {
        spec: args.spec,
        force: args.force,
    };

    init_project(ctx.cwd(), &opts)
}
