// src/paths.rs

//! Derived locations for a packaging run
//!
//! Every path the pipeline touches is computed here from the configuration,
//! so the pre-flight archive check and the archive step always agree on
//! the target file.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::manifest::ManifestFormat;
use std::path::{Component, Path, PathBuf};

/// Default staging directory, relative to the plugin root
pub const DEFAULT_PACKAGE_DIR: &str = "package";

/// Default archive output directory, relative to the plugin root
pub const DEFAULT_PACKAGES_DIR: &str = "packages";

/// Plugin root directory
pub fn root_path(config: &Config) -> PathBuf {
    config.root().to_path_buf()
}

/// Staging directory the archive contents are assembled in
///
/// The staging directory is deleted recursively at the start of every run,
/// so it must name a directory strictly below the plugin root.
pub fn package_path(config: &Config) -> Result<PathBuf> {
    let dir = config.get_str_or("paths.package", DEFAULT_PACKAGE_DIR)?;
    Ok(config.root().join(sanitize_relative(dir)?))
}

/// Output directory finished archives are moved into
pub fn packages_path(config: &Config) -> Result<PathBuf> {
    let dir = config.get_str_or("paths.packages", DEFAULT_PACKAGES_DIR)?;
    Ok(config.root().join(sanitize_relative(dir)?))
}

/// Manifest file inside the staging directory
pub fn manifest_file(config: &Config) -> Result<PathBuf> {
    let format = ManifestFormat::from_config(config)?;
    Ok(package_path(config)?.join(format.file_name()))
}

/// Archive file name: `prefix-version[-suffix].zip`
///
/// When the prefix already embeds the version string the version is not
/// repeated: `prefix[-suffix].zip`.
pub fn zip_file_name(config: &Config) -> Result<String> {
    let prefix = config.get_str("prefix")?;
    let version = config.get_str("manifest.version")?;
    let suffix = match config.get_str_or("suffix", "")? {
        "" => String::new(),
        s => format!("-{}", s),
    };

    if prefix.contains(version) {
        Ok(format!("{}{}.zip", prefix, suffix))
    } else {
        Ok(format!("{}-{}{}.zip", prefix, version, suffix))
    }
}

/// Full path of the archive this run produces
pub fn target_zip_path(config: &Config) -> Result<PathBuf> {
    Ok(packages_path(config)?.join(zip_file_name(config)?))
}

/// Resolve a configured relative path under the staging directory
pub fn staged(config: &Config, relative: &str) -> Result<PathBuf> {
    Ok(package_path(config)?.join(sanitize_relative(relative)?))
}

/// Sanitize a configured destination path
///
/// `.` components are skipped. Absolute paths and `..` components are
/// rejected so a destination can never leave its base directory, and an
/// empty result is rejected so a clean rule can never target the base
/// directory itself.
pub fn sanitize_relative(path: &str) -> Result<PathBuf> {
    let mut normalized = PathBuf::new();

    for component in Path::new(path).components() {
        match component {
            Component::Normal(c) => normalized.push(c),
            Component::CurDir => {}
            Component::ParentDir => return Err(Error::PathTraversal(path.to_string())),
            Component::Prefix(_) | Component::RootDir => {
                return Err(Error::InvalidPath(format!(
                    "'{}' must be relative to the staging directory",
                    path
                )));
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(Error::InvalidPath(format!(
            "'{}' does not name anything below the base directory",
            path
        )));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(content: &str) -> Config {
        Config::parse("/work/acme", content).unwrap()
    }

    #[test]
    fn test_zip_name_with_version() {
        let config = config("prefix = \"acme\"\n[manifest]\nversion = \"1.2.0\"\n");
        assert_eq!(zip_file_name(&config).unwrap(), "acme-1.2.0.zip");
    }

    #[test]
    fn test_zip_name_prefix_embeds_version() {
        let config = config("prefix = \"acme-1.2.0\"\n[manifest]\nversion = \"1.2.0\"\n");
        assert_eq!(zip_file_name(&config).unwrap(), "acme-1.2.0.zip");
    }

    #[test]
    fn test_zip_name_with_suffix() {
        let plain = config(
            "prefix = \"acme\"\nsuffix = \"beta\"\n[manifest]\nversion = \"1.2.0\"\n",
        );
        assert_eq!(zip_file_name(&plain).unwrap(), "acme-1.2.0-beta.zip");

        let embedded = config(
            "prefix = \"acme-1.2.0\"\nsuffix = \"beta\"\n[manifest]\nversion = \"1.2.0\"\n",
        );
        assert_eq!(zip_file_name(&embedded).unwrap(), "acme-1.2.0-beta.zip");
    }

    #[test]
    fn test_zip_name_requires_version() {
        let config = config("prefix = \"acme\"\n");
        assert!(matches!(
            zip_file_name(&config),
            Err(Error::MissingKey(ref k)) if k == "manifest.version"
        ));
    }

    #[test]
    fn test_derived_paths() {
        let config = config(
            "prefix = \"acme\"\n[paths]\npackage = \"build/stage\"\n[manifest]\nversion = \"2.0\"\n",
        );
        assert_eq!(package_path(&config).unwrap(), PathBuf::from("/work/acme/build/stage"));
        assert_eq!(packages_path(&config).unwrap(), PathBuf::from("/work/acme/packages"));
        assert_eq!(
            manifest_file(&config).unwrap(),
            PathBuf::from("/work/acme/build/stage/manifest.php")
        );
        assert_eq!(
            target_zip_path(&config).unwrap(),
            PathBuf::from("/work/acme/packages/acme-2.0.zip")
        );
        assert_eq!(root_path(&config), PathBuf::from("/work/acme"));
    }

    #[test]
    fn test_staging_and_output_dirs_stay_below_root() {
        for (dir, traversal) in [("", false), (".", false), ("/", false), ("../elsewhere", true)] {
            let package = config(&format!("[paths]\npackage = \"{}\"\n", dir));
            let packages = config(&format!("[paths]\npackages = \"{}\"\n", dir));
            for result in [package_path(&package), packages_path(&packages)] {
                match result {
                    Err(Error::PathTraversal(_)) => assert!(traversal, "'{}'", dir),
                    Err(Error::InvalidPath(_)) => assert!(!traversal, "'{}'", dir),
                    other => panic!("'{}' accepted: {:?}", dir, other),
                }
            }
        }
    }

    #[test]
    fn test_sanitize_relative() {
        assert_eq!(
            sanitize_relative("custom/modules/Acme").unwrap(),
            PathBuf::from("custom/modules/Acme")
        );
        assert_eq!(
            sanitize_relative("custom/./include/").unwrap(),
            PathBuf::from("custom/include")
        );
        assert!(matches!(
            sanitize_relative("/etc/passwd"),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            sanitize_relative("custom/../../etc"),
            Err(Error::PathTraversal(_))
        ));
        assert!(matches!(sanitize_relative("."), Err(Error::InvalidPath(_))));
        assert!(matches!(sanitize_relative(""), Err(Error::InvalidPath(_))));
    }
}
