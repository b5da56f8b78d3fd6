//! `umpkg version` command

use anyhow::Result;

pub fn execute() -> Result<()> {
    println!(
        "umpkg {}, Copyright (c) 2021-22, Ultramarine Linux Team",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}
