//! High-level operations.
//!
//! This module contains the implementation of umpkg commands.

pub mod setup;
pub mod umpkg_build;
pub mod umpkg_get;
pub mod umpkg_init;
pub mod umpkg_push;

pub use setup::{format_report, setup, CheckResult, SetupReport};
pub use umpkg_build::{build, build_with_config, check_summary, BuildOptions};
pub use umpkg_get::{get, repo_url, GetOptions};
pub use umpkg_init::{init_project, InitOptions};
pub use umpkg_push::{koji_command, push, PushOptions};
