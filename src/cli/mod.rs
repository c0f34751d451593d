// src/cli/mod.rs
//! CLI definitions for plugin-packager
//!
//! This module contains the command-line interface definitions using clap.
//! The command implementations are in the `commands` module.
//!
//! - `init` - Write a starter plugin.toml
//! - `package` - Build the plugin archive
//! - `sync` - Push/pull files to and from a live installation
//! - `completions` - Print shell completions

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "plugin-packager")]
#[command(author = "Plugin Packager Contributors")]
#[command(version)]
#[command(about = "Assembles installable CMS plugin archives", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter plugin.toml
    Init {
        /// Plugin root directory
        #[arg(default_value = ".")]
        path: String,

        /// Replace an existing plugin.toml
        #[arg(long)]
        force: bool,
    },

    /// Build the plugin archive
    Package {
        /// Delete an existing archive of the same version first
        #[arg(long)]
        force: bool,

        /// Allow replacing an existing archive of the same version
        #[arg(long)]
        overwrite: bool,

        /// Archive name suffix (<prefix>-<version>-<suffix>.zip)
        #[arg(long)]
        suffix: Option<String>,

        /// Stop after writing the manifest; leave the staging directory
        #[arg(long)]
        no_zip: bool,

        /// Run as if started in this directory
        #[arg(short = 'C', long = "directory", default_value = ".")]
        directory: String,
    },

    /// Synchronize dev mappings with a live installation
    ///
    /// Default direction is plugin -> installation.
    Sync {
        /// Root directory of the installation
        target: String,

        /// Reverse direction: installation -> plugin
        #[arg(short = 'B', long)]
        back: bool,

        /// Run as if started in this directory
        #[arg(short = 'C', long = "directory", default_value = ".")]
        directory: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_package_flags() {
        let cli = Cli::parse_from([
            "plugin-packager",
            "package",
            "--force",
            "--suffix",
            "beta",
            "-C",
            "plugins/acme",
        ]);
        match cli.command {
            Some(Commands::Package {
                force,
                overwrite,
                suffix,
                no_zip,
                directory,
            }) => {
                assert!(force);
                assert!(!overwrite);
                assert_eq!(suffix.as_deref(), Some("beta"));
                assert!(!no_zip);
                assert_eq!(directory, "plugins/acme");
            }
            _ => panic!("expected package command"),
        }
    }

    #[test]
    fn test_parse_sync_back() {
        let cli = Cli::parse_from(["plugin-packager", "-v", "sync", "/srv/crm", "-B"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Some(Commands::Sync { back: true, ref target, .. }) if target == "/srv/crm"
        ));
    }
}
