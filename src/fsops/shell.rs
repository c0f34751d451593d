// src/fsops/shell.rs

//! Filesystem backend that shells out to standard tools
//!
//! Each operation checks its tool is on `PATH` before running it, so a
//! missing `rsync` or `zip` is reported by name rather than as a spawn
//! failure.

use super::FileOps;
use crate::error::{Error, Result};
use crate::process::{require_tool, run};
use std::path::Path;
use std::process::Command;

/// Backend built on rsync, cp, mkdir, rm, find, zip and mv
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellFileOps;

impl ShellFileOps {
    fn command(tool: &str) -> Result<Command> {
        Ok(Command::new(require_tool(tool)?))
    }
}

impl FileOps for ShellFileOps {
    fn sync_tree(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Err(Error::external(
                "rsync",
                format!("{}: no such file or directory", from.display()),
            ));
        }

        let mut command = Self::command("rsync")?;
        command.arg("-r");
        if from.is_dir() {
            // Trailing slashes merge contents instead of nesting the directory
            command
                .arg(format!("{}/", from.display()))
                .arg(format!("{}/", to.display()));
        } else {
            command.arg(from).arg(to);
        }
        run(&mut command, "rsync")
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        let mut command = Self::command("cp")?;
        command.arg(from).arg(to);
        run(&mut command, "cp")
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut command = Self::command("mkdir")?;
        command.arg("-p").arg(path);
        run(&mut command, "mkdir")
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        let mut command = Self::command("rm")?;
        command.arg("-rf").arg(path);
        run(&mut command, "rm")
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut command = Self::command("rm")?;
        command.arg(path);
        run(&mut command, "rm")
    }

    fn remove_matching(&self, dir: &Path, pattern: &str) -> Result<()> {
        let mut command = Self::command("find")?;
        command
            .arg(dir)
            .args(["-mindepth", "1", "-name", pattern, "-prune"])
            .args(["-exec", "rm", "-rf", "{}", "+"]);
        run(&mut command, "find")
    }

    fn prune_empty_dirs(&self, dir: &Path) -> Result<()> {
        let mut command = Self::command("find")?;
        command
            .arg(dir)
            .args(["-mindepth", "1", "-type", "d", "-empty", "-delete"]);
        run(&mut command, "find")
    }

    fn compress(&self, dir: &Path, archive: &Path) -> Result<()> {
        let mut command = Self::command("zip")?;
        command
            .args(["-r", "-q"])
            .arg(archive)
            .arg(".")
            .current_dir(dir);
        run(&mut command, "zip")
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        let mut command = Self::command("mv")?;
        command.arg(from).arg(to);
        run(&mut command, "mv")
    }
}
