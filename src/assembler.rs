// src/assembler.rs

//! Packaging pipeline
//!
//! [`PackageCreator`] turns a plugin source tree into an installable archive.
//! The run is a fixed sequence of stages:
//!
//! ```text
//! CheckExisting -> SetupStagingDir -> SyncFiles -> CopyFiles -> Clean
//!   -> RunBuildHooks -> CompactEmptyDirs -> WriteManifest
//! ```
//!
//! followed by archive creation. Stages run strictly in order and the first
//! failure aborts the run. Nothing is retried and nothing is rolled back, so
//! a failed run may leave a partially populated staging directory behind;
//! the next run deletes it first.

use crate::archive;
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::fsops::{self, FileOps};
use crate::hooks::{BuildContext, BuildHooks, Builder, CommandBuilder, CommandHooks};
use crate::manifest;
use crate::paths;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CheckExisting,
    SetupStagingDir,
    SyncFiles,
    CopyFiles,
    Clean,
    RunBuildHooks,
    CompactEmptyDirs,
    WriteManifest,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::CheckExisting,
        Stage::SetupStagingDir,
        Stage::SyncFiles,
        Stage::CopyFiles,
        Stage::Clean,
        Stage::RunBuildHooks,
        Stage::CompactEmptyDirs,
        Stage::WriteManifest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::CheckExisting => "check existing archive",
            Stage::SetupStagingDir => "set up staging directory",
            Stage::SyncFiles => "sync files",
            Stage::CopyFiles => "copy files",
            Stage::Clean => "clean",
            Stage::RunBuildHooks => "run build hooks",
            Stage::CompactEmptyDirs => "remove empty directories",
            Stage::WriteManifest => "write manifest",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives one packaging run
///
/// The creator owns the configuration for the duration of the run since the
/// manifest stage writes derived keys back into it.
pub struct PackageCreator {
    config: Config,
    fs: Box<dyn FileOps>,
    hooks: Box<dyn BuildHooks>,
    builder: Box<dyn Builder>,
}

impl PackageCreator {
    /// Create a packager using the configured filesystem backend and the
    /// command-driven hooks and builder
    pub fn new(config: Config) -> Result<Self> {
        let fs = fsops::from_config(&config)?;
        Ok(Self {
            config,
            fs,
            hooks: Box::new(CommandHooks),
            builder: Box::new(CommandBuilder),
        })
    }

    /// Replace the filesystem backend
    pub fn with_file_ops(mut self, fs: Box<dyn FileOps>) -> Self {
        self.fs = fs;
        self
    }

    /// Replace the pre/post build hooks
    pub fn with_hooks(mut self, hooks: Box<dyn BuildHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replace the builder
    pub fn with_builder(mut self, builder: Box<dyn Builder>) -> Self {
        self.builder = builder;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline and build the archive
    ///
    /// Returns the path of the archive in the output directory.
    pub fn create(&mut self) -> Result<PathBuf> {
        self.package()?;
        let archive = archive::create_zip_file(&self.config, self.fs.as_ref())?;
        info!("Created {}", archive.display());
        Ok(archive)
    }

    /// Run every stage, leaving the finished staging directory in place
    pub fn package(&mut self) -> Result<()> {
        for stage in Stage::ALL {
            self.run_stage(stage)?;
        }
        Ok(())
    }

    /// Run a single stage
    pub fn run_stage(&mut self, stage: Stage) -> Result<()> {
        info!("Stage: {}", stage);
        match stage {
            Stage::CheckExisting => self.check_existing(),
            Stage::SetupStagingDir => self.setup_staging_dir(),
            Stage::SyncFiles => self.sync_files(),
            Stage::CopyFiles => self.copy_files(),
            Stage::Clean => self.clean(),
            Stage::RunBuildHooks => self.run_build_hooks(),
            Stage::CompactEmptyDirs => self.compact_empty_dirs(),
            Stage::WriteManifest => manifest::write_manifest(&mut self.config).map(|_| ()),
        }
    }

    /// Enforce the existing-archive policy
    ///
    /// `force` deletes an existing archive, `overwrite` lets the run proceed
    /// and replace it at the end. With neither set an existing archive is
    /// fatal.
    fn check_existing(&self) -> Result<()> {
        let target = paths::target_zip_path(&self.config)?;
        if !target.exists() {
            return Ok(());
        }

        if self.config.get_bool_or("force", false)? {
            info!("Removing existing archive {}", target.display());
            return self.fs.remove_file(&target);
        }

        if self.config.get_bool_or("overwrite", false)? {
            warn!("Archive {} will be overwritten", target.display());
            return Ok(());
        }

        let version = self.config.get_str("manifest.version")?;
        Err(Error::PackageVersionExists {
            message: version_exists_message(&target, version),
            path: target,
        })
    }

    /// Recreate the staging directory empty
    fn setup_staging_dir(&self) -> Result<()> {
        let package = paths::package_path(&self.config)?;
        self.check_staging_outside_sources(&package)?;
        self.fs.remove_tree(&package)?;
        self.fs.create_dir_all(&package)
    }

    /// Merge each `sync` source tree into the staging directory
    fn sync_files(&self) -> Result<()> {
        let root = self.config.root();
        for mapping in config::mappings(&self.config, "sync")? {
            let to = paths::staged(&self.config, &mapping.to)?;
            self.ensure_parent(&to)?;
            debug!("sync {} -> {}", mapping.from, to.display());
            self.fs.sync_tree(&root.join(&mapping.from), &to)?;
        }
        Ok(())
    }

    /// Copy each `copy` source file into the staging directory
    fn copy_files(&self) -> Result<()> {
        let root = self.config.root();
        for mapping in config::mappings(&self.config, "copy")? {
            let to = paths::staged(&self.config, &mapping.to)?;
            self.ensure_parent(&to)?;
            debug!("copy {} -> {}", mapping.from, to.display());
            self.fs.copy_file(&root.join(&mapping.from), &to)?;
        }
        Ok(())
    }

    /// Apply `globalClean` patterns, then delete `clean` paths
    fn clean(&self) -> Result<()> {
        let package = paths::package_path(&self.config)?;

        for pattern in self.config.str_list("globalClean")? {
            debug!("globalClean {}", pattern);
            self.fs.remove_matching(&package, &pattern)?;
        }

        for path in self.config.str_list("clean")? {
            let target = paths::staged(&self.config, &path)?;
            debug!("clean {}", target.display());
            self.fs.remove_tree(&target)?;
        }

        Ok(())
    }

    fn run_build_hooks(&self) -> Result<()> {
        let ctx = BuildContext::new(&self.config)?;
        self.hooks.pre_build(&ctx)?;
        self.builder.build(&ctx)?;
        self.hooks.post_build(&ctx)
    }

    fn compact_empty_dirs(&self) -> Result<()> {
        let package = paths::package_path(&self.config)?;
        self.fs.prune_empty_dirs(&package)
    }

    /// A staging directory inside a sync source would be copied into itself
    fn check_staging_outside_sources(&self, package: &Path) -> Result<()> {
        let root = self.config.root();
        for mapping in config::mappings(&self.config, "sync")? {
            let source = root.join(&mapping.from);
            if package.starts_with(&source) {
                return Err(Error::InvalidPath(format!(
                    "staging directory {} lies inside sync source '{}'",
                    package.display(),
                    mapping.from
                )));
            }
        }
        Ok(())
    }

    fn ensure_parent(&self, path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) => self.fs.create_dir_all(parent),
            None => Ok(()),
        }
    }
}

fn version_exists_message(target: &Path, version: &str) -> String {
    format!(
        "{} already exists.\n\
         The current version of the plugin has already been packaged.\n\
         Bump manifest.version in {} (currently '{}'),\n\
         or pass --force to rebuild it or --overwrite to replace it.",
        target.display(),
        config::CONFIG_FILE,
        version
    )
}
