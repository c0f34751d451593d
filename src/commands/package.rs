// src/commands/package.rs

//! Package building

use anyhow::{Context, Result};
use plugin_packager::{Config, PackageCreator, paths};
use std::path::Path;
use tracing::info;

/// Command-line overrides for a packaging run
#[derive(Debug, Default)]
pub struct PackageOptions {
    pub force: bool,
    pub overwrite: bool,
    pub suffix: Option<String>,
    pub no_zip: bool,
}

/// Run the packaging pipeline for the plugin containing `directory`
pub fn cmd_package(directory: &str, options: PackageOptions) -> Result<()> {
    let mut config = Config::discover(Path::new(directory))
        .context("Failed to load plugin configuration")?;

    // Flags only ever switch a policy on; config values stand otherwise
    if options.force {
        config.set("force", true)?;
    }
    if options.overwrite {
        config.set("overwrite", true)?;
    }
    if let Some(suffix) = options.suffix {
        config.set("suffix", suffix)?;
    }

    info!("Packaging plugin at {}", config.root().display());
    let mut creator = PackageCreator::new(config).context("Failed to set up packager")?;

    if options.no_zip {
        creator.package().context("Packaging failed")?;
        let staging = paths::package_path(creator.config())?;
        println!("Staged package at {}", staging.display());
    } else {
        let archive = creator.create().context("Packaging failed")?;
        println!("Created {}", archive.display());
    }

    Ok(())
}
