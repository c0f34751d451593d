// src/commands/init.rs

//! Starter configuration

use anyhow::{Context, Result};
use plugin_packager::CONFIG_FILE;
use plugin_packager::config::template;
use std::path::Path;

/// Write a template plugin.toml into `path`
pub fn cmd_init(path: &str, force: bool) -> Result<()> {
    let dir = Path::new(path);
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists at {}. Use --force to overwrite.",
            CONFIG_FILE,
            config_path.display()
        );
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    std::fs::write(&config_path, template::render())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set 'prefix' and 'manifest.name' (packaging refuses the '{}' placeholders)",
        template::TEMPLATE_PREFIX
    );
    println!("  2. List the files to package under [sync] and [copy]");
    println!("  3. Run 'plugin-packager package' to build the archive");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_existing_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_str().unwrap();

        cmd_init(path, false).unwrap();
        assert!(temp_dir.path().join(CONFIG_FILE).is_file());

        assert!(cmd_init(path, false).is_err());
        cmd_init(path, true).unwrap();
    }
}
