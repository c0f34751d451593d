// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use plugin_packager::{CONFIG_FILE, Config};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Minimal valid configuration: a prefix, a manifest and a `src` sync.
pub const BASIC_CONFIG: &str = r#"
prefix = "acme"

[sync]
"src" = "src"

[manifest]
name = "Acme"
version = "1.2.0"
"#;

/// Create a plugin tree with `plugin.toml` and the given source files.
///
/// Returns the TempDir holding the plugin root; keep it alive for the test.
pub fn setup_plugin(config: &str, files: &[(&str, &str)]) -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join(CONFIG_FILE), config).unwrap();
    for (path, content) in files {
        write_file(&temp_dir.path().join(path), content);
    }
    temp_dir
}

/// Load the plugin configuration from a plugin root.
pub fn load_config(root: &Path) -> Config {
    Config::load(&root.join(CONFIG_FILE)).unwrap()
}

/// Write a file, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// All paths below `dir`, relative and '/'-joined, sorted. Directories end
/// with '/'.
pub fn tree(dir: &Path) -> Vec<String> {
    let mut entries: Vec<String> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .map(|e| {
            let e = e.unwrap();
            let rel = e.path().strip_prefix(dir).unwrap().to_string_lossy().to_string();
            if e.file_type().is_dir() {
                format!("{}/", rel)
            } else {
                rel
            }
        })
        .collect();
    entries.sort();
    entries
}

/// Entry names of a zip archive, sorted.
pub fn zip_entries(archive: &Path) -> Vec<String> {
    let file = fs::File::open(archive).unwrap();
    let zip = zip::ZipArchive::new(file).unwrap();
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    names
}

/// Staging directory of a plugin with default paths.
pub fn staging(root: &Path) -> PathBuf {
    root.join("package")
}
