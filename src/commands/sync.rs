// src/commands/sync.rs

//! Dev sync with a live installation

use anyhow::{Context, Result};
use plugin_packager::{Config, Direction, devsync, fsops};
use std::path::Path;

/// Push (or with `back`, pull) the configured dev mappings
pub fn cmd_sync(target: &str, back: bool, directory: &str) -> Result<()> {
    let config = Config::discover(Path::new(directory))
        .context("Failed to load plugin configuration")?;
    let fs = fsops::from_config(&config)?;

    let direction = if back { Direction::Pull } else { Direction::Push };
    let count = devsync::sync(&config, fs.as_ref(), Path::new(target), direction)
        .with_context(|| format!("Failed to sync with {}", target))?;

    let arrow = match direction {
        Direction::Push => "->",
        Direction::Pull => "<-",
    };
    println!("Synced {} path(s): plugin {} {}", count, arrow, target);
    Ok(())
}
