// src/commands/mod.rs
//! Command handlers for the plugin-packager CLI

mod init;
mod package;
mod sync;

pub use init::cmd_init;
pub use package::{PackageOptions, cmd_package};
pub use sync::cmd_sync;
