// src/hooks.rs

//! Build hooks and builder invoked during packaging
//!
//! After files are placed and cleaned, the pipeline gives the plugin a
//! chance to transform the staging directory: a pre-build hook, the build
//! itself, then a post-build hook. All three are traits so callers can plug
//! in their own behavior; the defaults run shell command lists from the
//! configuration:
//!
//! ```toml
//! [hooks]
//! pre_build = ["composer install --no-dev"]
//! post_build = ["rm -rf vendor/bin"]
//!
//! [build]
//! commands = ["npm run build"]
//! ```
//!
//! Commands run through `sh -c` with the staging directory as working
//! directory and these variables set:
//! - `PLUGIN_ROOT`: plugin root directory
//! - `PLUGIN_PACKAGE_DIR`: staging directory
//! - `PLUGIN_PREFIX`: configured prefix (empty when unset)

use crate::config::Config;
use crate::error::Result;
use crate::paths;
use crate::process;
use std::path::PathBuf;
use tracing::info;

/// What a hook or builder gets to see of the current run
#[derive(Debug)]
pub struct BuildContext<'a> {
    pub config: &'a Config,
    pub package_dir: PathBuf,
}

impl<'a> BuildContext<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        Ok(Self {
            config,
            package_dir: paths::package_path(config)?,
        })
    }

    fn env(&self) -> Result<Vec<(&'static str, String)>> {
        Ok(vec![
            ("PLUGIN_ROOT", self.config.root().display().to_string()),
            ("PLUGIN_PACKAGE_DIR", self.package_dir.display().to_string()),
            ("PLUGIN_PREFIX", self.config.get_str_or("prefix", "")?.to_string()),
        ])
    }

    /// Run each command in order, stopping at the first failure
    fn run_commands(&self, key: &str) -> Result<()> {
        let commands = self.config.str_list(key)?;
        if commands.is_empty() {
            return Ok(());
        }

        let env = self.env()?;
        let env: Vec<(&str, &str)> = env.iter().map(|(k, v)| (*k, v.as_str())).collect();
        for command in &commands {
            info!("[{}] {}", key, command);
            process::run_shell(command, &self.package_dir, &env)?;
        }
        Ok(())
    }
}

/// Hooks run around the build step
pub trait BuildHooks {
    fn pre_build(&self, ctx: &BuildContext<'_>) -> Result<()>;
    fn post_build(&self, ctx: &BuildContext<'_>) -> Result<()>;
}

/// Transforms the staging directory in place
pub trait Builder {
    fn build(&self, ctx: &BuildContext<'_>) -> Result<()>;
}

/// Runs `hooks.pre_build` and `hooks.post_build`
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandHooks;

impl BuildHooks for CommandHooks {
    fn pre_build(&self, ctx: &BuildContext<'_>) -> Result<()> {
        ctx.run_commands("hooks.pre_build")
    }

    fn post_build(&self, ctx: &BuildContext<'_>) -> Result<()> {
        ctx.run_commands("hooks.post_build")
    }
}

/// Runs `build.commands`
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandBuilder;

impl Builder for CommandBuilder {
    fn build(&self, ctx: &BuildContext<'_>) -> Result<()> {
        ctx.run_commands("build.commands")
    }
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl BuildHooks for NoopHooks {
    fn pre_build(&self, _ctx: &BuildContext<'_>) -> Result<()> {
        Ok(())
    }

    fn post_build(&self, _ctx: &BuildContext<'_>) -> Result<()> {
        Ok(())
    }
}

impl Builder for NoopHooks {
    fn build(&self, _ctx: &BuildContext<'_>) -> Result<()> {
        Ok(())
    }
}
