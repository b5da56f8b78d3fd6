//! `umpkg push` command

use anyhow::Result;

use crate::cli::PushArgs;
use umpkg::ops::umpkg_push::{push, PushOptions};
use umpkg::util::GlobalContext;

pub fn execute(args: PushArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let opts = PushOptions {
        tag: args.tag,
        path: args.spec,
        scratch: args.scratch,
        nowait: args.nowait,
    };

    let pushed = push(&ctx, &opts)?;
    for srpm in &pushed {
        eprintln!("      Pushed {}", srpm.display());
    }

    Ok(())
}
