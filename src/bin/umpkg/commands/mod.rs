//! Command implementations

pub mod build;
pub mod buildsrc;
pub mod get;
pub mod init;
pub mod push;
pub mod setup;
pub mod version;
