// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: plugin directory
fn directory_arg() -> Arg {
    Arg::new("directory")
        .short('C')
        .long("directory")
        .value_name("DIR")
        .default_value(".")
        .help("Run as if started in this directory")
}

fn build_cli() -> Command {
    Command::new("plugin-packager")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Plugin Packager Contributors")
        .about("Assembles installable CMS plugin archives")
        .subcommand_required(false)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (overridden by RUST_LOG)"),
        )
        .subcommand(
            Command::new("init")
                .about("Write a starter plugin.toml")
                .arg(Arg::new("path").default_value(".").help("Plugin root directory"))
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Replace an existing plugin.toml"),
                ),
        )
        .subcommand(
            Command::new("package")
                .about("Build the plugin archive")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Delete an existing archive of the same version first"),
                )
                .arg(
                    Arg::new("overwrite")
                        .long("overwrite")
                        .action(ArgAction::SetTrue)
                        .help("Allow replacing an existing archive of the same version"),
                )
                .arg(
                    Arg::new("suffix")
                        .long("suffix")
                        .value_name("SUFFIX")
                        .help("Archive name suffix"),
                )
                .arg(
                    Arg::new("no_zip")
                        .long("no-zip")
                        .action(ArgAction::SetTrue)
                        .help("Stop after writing the manifest"),
                )
                .arg(directory_arg()),
        )
        .subcommand(
            Command::new("sync")
                .about("Synchronize dev mappings with a live installation")
                .arg(Arg::new("target").required(true).help("Root directory of the installation"))
                .arg(
                    Arg::new("back")
                        .short('B')
                        .long("back")
                        .action(ArgAction::SetTrue)
                        .help("Reverse direction: installation -> plugin"),
                )
                .arg(directory_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("plugin-packager.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
