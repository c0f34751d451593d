// src/devsync.rs

//! Development sync between the plugin tree and a live installation
//!
//! The `dev` table maps plugin-relative paths to paths relative to the root
//! of a host installation:
//!
//! ```toml
//! [dev]
//! "src/modules/Acme" = "modules/Acme"
//! "src/custom/Extension" = "custom/Extension"
//! ```
//!
//! Pushing copies plugin files into the installation; pulling copies edits
//! made in the installation back into the plugin tree. Both directions merge
//! and never delete files at the destination.

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::fsops::FileOps;
use crate::paths;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Which way files flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// plugin -> installation
    Push,
    /// installation -> plugin
    Pull,
}

/// Sync every `dev` mapping against the installation at `target`
///
/// Returns the number of mappings synced. When pushing, a symlink at the
/// destination (a common way to link a plugin into an installation) is
/// removed first so real files replace it.
pub fn sync(
    config: &Config,
    fs: &dyn FileOps,
    target: &Path,
    direction: Direction,
) -> Result<usize> {
    config.get("dev")?;
    let mappings = config::mappings(config, "dev")?;

    if !target.is_dir() {
        return Err(Error::InvalidPath(format!(
            "installation directory {} does not exist",
            target.display()
        )));
    }

    let root = config.root();
    for mapping in &mappings {
        let (from, to) = match direction {
            Direction::Push => (
                root.join(&mapping.from),
                target.join(paths::sanitize_relative(&mapping.to)?),
            ),
            Direction::Pull => (
                target.join(&mapping.to),
                root.join(paths::sanitize_relative(&mapping.from)?),
            ),
        };

        if direction == Direction::Push && is_symlink(&to) {
            debug!("Removing symlink {}", to.display());
            fs.remove_file(&to)?;
        }

        if let Some(parent) = to.parent() {
            fs.create_dir_all(parent)?;
        }
        info!("{} -> {}", from.display(), to.display());
        fs.sync_tree(&from, &to)?;
    }

    Ok(mappings.len())
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsops::NativeFileOps;
    use tempfile::TempDir;

    const DEV: &str = "[dev]\n\"src/modules/Acme\" = \"modules/Acme\"\n";

    fn setup() -> (TempDir, TempDir, Config) {
        let plugin = TempDir::new().unwrap();
        let install = TempDir::new().unwrap();
        let module = plugin.path().join("src/modules/Acme");
        fs::create_dir_all(&module).unwrap();
        fs::write(module.join("Acme.php"), "v1").unwrap();
        let config = Config::parse(plugin.path(), DEV).unwrap();
        (plugin, install, config)
    }

    #[test]
    fn test_push_then_pull() {
        let (plugin, install, config) = setup();

        let count = sync(&config, &NativeFileOps, install.path(), Direction::Push).unwrap();
        assert_eq!(count, 1);
        let remote = install.path().join("modules/Acme/Acme.php");
        assert_eq!(fs::read_to_string(&remote).unwrap(), "v1");

        fs::write(&remote, "v2").unwrap();
        sync(&config, &NativeFileOps, install.path(), Direction::Pull).unwrap();
        assert_eq!(
            fs::read_to_string(plugin.path().join("src/modules/Acme/Acme.php")).unwrap(),
            "v2"
        );
    }

    #[test]
    fn test_push_replaces_symlink() {
        let (plugin, install, config) = setup();
        fs::create_dir_all(install.path().join("modules")).unwrap();
        std::os::unix::fs::symlink(
            plugin.path().join("src/modules/Acme"),
            install.path().join("modules/Acme"),
        )
        .unwrap();

        sync(&config, &NativeFileOps, install.path(), Direction::Push).unwrap();

        let dest = install.path().join("modules/Acme");
        assert!(!fs::symlink_metadata(&dest).unwrap().file_type().is_symlink());
        assert!(dest.join("Acme.php").is_file());
    }

    #[test]
    fn test_missing_dev_key() {
        let install = TempDir::new().unwrap();
        let config = Config::parse("/plugin", "prefix = \"acme\"\n").unwrap();
        assert!(matches!(
            sync(&config, &NativeFileOps, install.path(), Direction::Push),
            Err(Error::MissingKey(ref k)) if k == "dev"
        ));
    }

    #[test]
    fn test_missing_target() {
        let (_plugin, install, config) = setup();
        let missing = install.path().join("nope");
        assert!(matches!(
            sync(&config, &NativeFileOps, &missing, Direction::Push),
            Err(Error::InvalidPath(_))
        ));
    }
}
