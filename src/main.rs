// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use commands::PackageOptions;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Some(Commands::Init { path, force }) => commands::cmd_init(&path, force),
        Some(Commands::Package {
            force,
            overwrite,
            suffix,
            no_zip,
            directory,
        }) => commands::cmd_package(
            &directory,
            PackageOptions {
                force,
                overwrite,
                suffix,
                no_zip,
            },
        ),
        Some(Commands::Sync {
            target,
            back,
            directory,
        }) => commands::cmd_sync(&target, back, &directory),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "plugin-packager",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
