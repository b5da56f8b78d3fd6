//! `umpkg get` command

use anyhow::Result;

use crate::cli::GetArgs;
use umpkg::ops::umpkg_get::{get, GetOptions};
use umpkg::util::GlobalContext;

pub fn execute(args: GetArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let opts = GetOptions {
        name: args.name,
        branch: args.branch,
    };

    let dest = get(&ctx, &opts)?;
    eprintln!("     Cloned into {}", dest.display());

    Ok(())
}
