// src/lib.rs

//! Plugin Packager
//!
//! Builds installable CMS plugin archives from a plugin source tree.
//!
//! # Architecture
//!
//! - Configuration: one `plugin.toml` per plugin, read into a mutable tree
//! - Pipeline: staging, file placement, cleaning, build hooks, compaction,
//!   manifest generation, then a zip archive
//! - Filesystem work behind the `FileOps` trait (native or shell tools)
//! - Dev sync: push/pull plugin files to and from a live installation

pub mod archive;
pub mod assembler;
pub mod config;
pub mod copyspec;
pub mod devsync;
mod error;
pub mod fsops;
pub mod hooks;
pub mod manifest;
pub mod paths;
pub mod process;

pub use assembler::{PackageCreator, Stage};
pub use config::{CONFIG_FILE, Config, FileMapping};
pub use copyspec::CopyDef;
pub use devsync::Direction;
pub use error::{Error, Result};
pub use fsops::{FileOps, NativeFileOps, ShellFileOps};
pub use hooks::{BuildContext, BuildHooks, Builder};
pub use manifest::ManifestFormat;
