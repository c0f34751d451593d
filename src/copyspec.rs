// src/copyspec.rs

//! Copy definition expansion for `installdefs.copy`
//!
//! The host installer only understands file-level copy entries, but writing
//! one entry per file by hand is impractical. Entries whose source is a
//! directory are therefore expanded into one entry per regular file below
//! it before the manifest is written.
//!
//! Sources may contain the `<basepath>` token. It is resolved against the
//! staging directory once, up front, to locate files on disk; the emitted
//! strings keep the token because the installer substitutes it itself.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Token the host installer replaces with the unpacked archive root
pub const BASEPATH_TOKEN: &str = "<basepath>";

/// A declarative `{from, to}` copy instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyDef {
    pub from: String,
    pub to: String,
}

impl CopyDef {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A copy definition plus the on-disk location of its source
#[derive(Debug, Clone)]
pub struct ResolvedCopyDef {
    pub def: CopyDef,
    pub source: PathBuf,
}

/// Resolve `<basepath>` in every `from` against `base`
///
/// Sources without the token are taken relative to `base` as well.
pub fn resolve(defs: Vec<CopyDef>, base: &Path) -> Vec<ResolvedCopyDef> {
    let base_str = base.to_string_lossy();
    defs.into_iter()
        .map(|def| {
            let substituted = def.from.replace(BASEPATH_TOKEN, &base_str);
            let source = base.join(substituted);
            ResolvedCopyDef { def, source }
        })
        .collect()
}

/// Expand directory-valued entries into file-level entries
///
/// Files below a directory are emitted in ascending order of their relative
/// path. Symlinks and other non-regular files are skipped. A source that is
/// neither a file nor a directory fails with [`Error::InvalidCopySpec`].
pub fn expand(resolved: &[ResolvedCopyDef]) -> Result<Vec<CopyDef>> {
    let mut expanded = Vec::new();

    for entry in resolved {
        if entry.source.is_dir() {
            let files = relative_files(&entry.source)?;
            debug!(
                "Expanded {} into {} file entries",
                entry.def.from,
                files.len()
            );
            for rel in files {
                expanded.push(CopyDef::new(
                    format!("{}/{}", entry.def.from, rel),
                    format!("{}/{}", entry.def.to, rel),
                ));
            }
        } else if entry.source.is_file() {
            expanded.push(entry.def.clone());
        } else {
            return Err(Error::InvalidCopySpec(entry.source.display().to_string()));
        }
    }

    Ok(expanded)
}

/// Regular files below `dir` as sorted '/'-joined relative paths
fn relative_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::external("walk", "filesystem loop detected"),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| Error::InvalidPath(e.to_string()))?;
        files.push(
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        );
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_directory_expands_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let stage = temp_dir.path();
        touch(&stage.join("src/x/b.php"));
        touch(&stage.join("src/x/a.php"));
        touch(&stage.join("src/x/sub/c.php"));

        let defs = vec![CopyDef::new("<basepath>/src/x", "custom/x")];
        let expanded = expand(&resolve(defs, stage)).unwrap();

        assert_eq!(
            expanded,
            vec![
                CopyDef::new("<basepath>/src/x/a.php", "custom/x/a.php"),
                CopyDef::new("<basepath>/src/x/b.php", "custom/x/b.php"),
                CopyDef::new("<basepath>/src/x/sub/c.php", "custom/x/sub/c.php"),
            ]
        );
    }

    #[test]
    fn test_file_entry_is_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("LICENSE"));

        let def = CopyDef::new("<basepath>/LICENSE", "LICENSE");
        let expanded = expand(&resolve(vec![def.clone()], temp_dir.path())).unwrap();
        assert_eq!(expanded, vec![def]);
    }

    #[test]
    fn test_relative_source_without_token() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("src/a.php"));

        let expanded =
            expand(&resolve(vec![CopyDef::new("src", "custom")], temp_dir.path())).unwrap();
        assert_eq!(expanded, vec![CopyDef::new("src/a.php", "custom/a.php")]);
    }

    #[test]
    fn test_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let defs = vec![CopyDef::new("<basepath>/nope", "x")];
        let err = expand(&resolve(defs, temp_dir.path())).unwrap_err();
        match err {
            Error::InvalidCopySpec(path) => assert!(path.ends_with("nope")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_directory_expands_to_nothing() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("empty")).unwrap();
        let defs = vec![CopyDef::new("<basepath>/empty", "e")];
        assert!(expand(&resolve(defs, temp_dir.path())).unwrap().is_empty());
    }
}
