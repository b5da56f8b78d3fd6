//! `umpkg setup` command

use anyhow::Result;

use umpkg::ops::setup::{format_report, setup};
use umpkg::util::GlobalContext;

pub fn execute() -> Result<()> {
    let ctx = GlobalContext::new()?;
    let report = setup(&ctx)?;

    print!("{}", format_report(&report));

    // Exit with error code if the configured backend is missing
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
