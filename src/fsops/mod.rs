// src/fsops/mod.rs

//! Filesystem operations used by the packaging pipeline
//!
//! The pipeline never touches the filesystem in bulk directly; it goes
//! through [`FileOps`]. Two backends exist:
//! - [`NativeFileOps`]: pure Rust (walkdir, glob, zip)
//! - [`ShellFileOps`]: external tools (rsync, cp, rm, find, zip, mv)
//!
//! Each operation either succeeds or fails as a whole; there is no partial
//! success signal.

mod native;
mod shell;

pub use native::NativeFileOps;
pub use shell::ShellFileOps;

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::Path;

/// Bulk filesystem capability
pub trait FileOps {
    /// Merge `from` (file or directory) into `to`, overwriting existing files
    /// and keeping files that exist only at the destination
    fn sync_tree(&self, from: &Path, to: &Path) -> Result<()>;

    /// Copy a single regular file, overwriting the destination
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Create a directory and any missing parents
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Recursively delete a file or directory; absent paths are not an error
    fn remove_tree(&self, path: &Path) -> Result<()>;

    /// Delete a single file or symlink
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Delete every entry below `dir` whose file name matches `pattern`
    fn remove_matching(&self, dir: &Path, pattern: &str) -> Result<()>;

    /// Remove every empty directory below `dir`, keeping `dir` itself
    fn prune_empty_dirs(&self, dir: &Path) -> Result<()>;

    /// Compress the contents of `dir` into a zip archive at `archive`
    fn compress(&self, dir: &Path, archive: &Path) -> Result<()>;

    /// Move a file, across filesystems if needed
    fn move_file(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Available backends, selected by the `fs_backend` key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Native,
    Shell,
}

impl Backend {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "native" => Some(Self::Native),
            "shell" => Some(Self::Shell),
            _ => None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let name = config.get_str_or("fs_backend", "native")?;
        Self::parse(name).ok_or_else(|| {
            Error::ConfigValidation(format!(
                "unknown fs_backend '{}' (expected 'native' or 'shell')",
                name
            ))
        })
    }

    pub fn create(self) -> Box<dyn FileOps> {
        match self {
            Self::Native => Box::new(NativeFileOps),
            Self::Shell => Box::new(ShellFileOps),
        }
    }
}

/// Build the backend configured for this plugin
pub fn from_config(config: &Config) -> Result<Box<dyn FileOps>> {
    Ok(Backend::from_config(config)?.create())
}
