// src/archive.rs

//! Archive creation from the staging directory

use crate::config::Config;
use crate::error::Result;
use crate::fsops::FileOps;
use crate::paths;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::{debug, info};

/// Compress the staging directory and move the archive into the output
/// directory
///
/// The archive is built in a temporary directory first so a failed
/// compression never leaves a truncated file where an existing archive used
/// to be. Entry names are relative to the staging root. The staging
/// directory is left as is.
pub fn create_zip_file(config: &Config, fs: &dyn FileOps) -> Result<PathBuf> {
    let package = paths::package_path(config)?;
    let target = paths::target_zip_path(config)?;
    let name = paths::zip_file_name(config)?;

    let scratch = TempDir::new()?;
    let intermediate = scratch.path().join(&name);

    info!("Compressing {}", package.display());
    fs.compress(&package, &intermediate)?;

    fs.create_dir_all(&paths::packages_path(config)?)?;
    debug!("Moving {} to {}", intermediate.display(), target.display());
    fs.move_file(&intermediate, &target)?;

    Ok(target)
}
