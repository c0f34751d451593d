// src/process.rs

//! Synchronous external process execution
//!
//! Commands run to completion with no timeout; a hung tool hangs the run.
//! Output is captured and folded into the error on failure.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Locate a tool on `PATH`
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|e| Error::external(name, format!("not found on PATH: {}", e)))
}

/// Run a prepared command, failing on spawn errors and non-zero exit
pub fn run(command: &mut Command, operation: &str) -> Result<()> {
    debug!("Running {:?}", command);

    let output = command
        .output()
        .map_err(|e| Error::external(operation, format!("could not start: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match stderr.trim() {
            "" => output.status.to_string(),
            msg => format!("{}: {}", output.status, msg),
        };
        return Err(Error::external(operation, detail));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!("{}: {}", operation, stdout.trim_end());
    }

    Ok(())
}

/// Run a shell command line via `sh -c` in `cwd`
pub fn run_shell(script: &str, cwd: &Path, envs: &[(&str, &str)]) -> Result<()> {
    let mut command = Command::new("sh");
    command.arg("-c").arg(script).current_dir(cwd);
    for (key, value) in envs {
        command.env(key, value);
    }
    run(&mut command, script)
}
