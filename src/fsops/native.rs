// src/fsops/native.rs

//! Pure Rust filesystem backend

use super::FileOps;
use crate::error::{Error, Result};
use glob::Pattern;
use std::fs::{self, File};
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Backend built on std::fs, walkdir, glob and zip
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeFileOps;

impl FileOps for NativeFileOps {
    fn sync_tree(&self, from: &Path, to: &Path) -> Result<()> {
        let meta = fs::metadata(from).map_err(|e| {
            Error::external("sync", format!("{}: {}", from.display(), e))
        })?;

        if meta.is_file() {
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(from, to)?;
            return Ok(());
        }

        fs::create_dir_all(to)?;
        for entry in WalkDir::new(from).min_depth(1) {
            let entry = entry.map_err(walk_error)?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| Error::InvalidPath(e.to_string()))?;
            let target = to.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)?;
            } else if file_type.is_file() {
                fs::copy(entry.path(), &target)?;
            } else {
                debug!("Skipping non-regular file {}", entry.path().display());
            }
        }

        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.is_file() {
            return Err(Error::external(
                "copy",
                format!("{} is not a regular file", from.display()),
            ));
        }
        fs::copy(from, to)
            .map_err(|e| Error::external("copy", format!("{}: {}", from.display(), e)))?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .map_err(|e| Error::external("mkdir", format!("{}: {}", path.display(), e)))
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let result = if meta.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        result.map_err(|e| Error::external("remove", format!("{}: {}", path.display(), e)))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
            .map_err(|e| Error::external("remove", format!("{}: {}", path.display(), e)))
    }

    fn remove_matching(&self, dir: &Path, pattern: &str) -> Result<()> {
        let matcher = Pattern::new(pattern).map_err(|e| {
            Error::ConfigValidation(format!("invalid clean pattern '{}': {}", pattern, e))
        })?;

        let mut matches: Vec<PathBuf> = Vec::new();
        let mut walker = WalkDir::new(dir).min_depth(1).into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry.map_err(walk_error)?;
            if !matcher.matches(&entry.file_name().to_string_lossy()) {
                continue;
            }
            if entry.file_type().is_dir() {
                // Everything below goes with it
                walker.skip_current_dir();
            }
            matches.push(entry.into_path());
        }

        for path in &matches {
            debug!("Removing {} (matches '{}')", path.display(), pattern);
            self.remove_tree(path)?;
        }

        Ok(())
    }

    fn prune_empty_dirs(&self, dir: &Path) -> Result<()> {
        for entry in WalkDir::new(dir).min_depth(1).contents_first(true) {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_dir() {
                continue;
            }
            if fs::read_dir(entry.path())?.next().is_none() {
                debug!("Removing empty directory {}", entry.path().display());
                fs::remove_dir(entry.path())?;
            }
        }
        Ok(())
    }

    fn compress(&self, dir: &Path, archive: &Path) -> Result<()> {
        let file = File::create(archive)
            .map_err(|e| Error::external("compress", format!("{}: {}", archive.display(), e)))?;
        let mut writer = zip::ZipWriter::new(file);

        for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(walk_error)?;
            let relative = entry
                .path()
                .strip_prefix(dir)
                .map_err(|e| Error::InvalidPath(e.to_string()))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let mode = entry.metadata().map_err(walk_error)?.permissions().mode();
            let options = SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(mode);

            if entry.file_type().is_dir() {
                writer
                    .add_directory(format!("{}/", name), options)
                    .map_err(zip_error)?;
            } else if entry.file_type().is_file() {
                writer.start_file(name, options).map_err(zip_error)?;
                let mut source = File::open(entry.path())?;
                io::copy(&mut source, &mut writer)?;
            } else {
                debug!("Not archiving non-regular file {}", entry.path().display());
            }
        }

        writer.finish().map_err(zip_error)?;
        Ok(())
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        if fs::rename(from, to).is_ok() {
            return Ok(());
        }
        // rename(2) cannot cross filesystems
        fs::copy(from, to)
            .map_err(|e| Error::external("move", format!("{}: {}", from.display(), e)))?;
        fs::remove_file(from)?;
        Ok(())
    }
}

fn walk_error(e: walkdir::Error) -> Error {
    match e.into_io_error() {
        Some(io) => Error::Io(io),
        None => Error::external("walk", "filesystem loop detected"),
    }
}

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::external("compress", e.to_string())
}
