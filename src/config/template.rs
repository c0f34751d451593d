// src/config/template.rs

//! Starter plugin.toml written by `init`
//!
//! The template ships with placeholder values for `prefix` and
//! `manifest.name`. Manifest validation refuses to package until both are
//! changed.

/// Placeholder prefix in a fresh configuration
pub const TEMPLATE_PREFIX: &str = "plugin_template";

/// Placeholder manifest name in a fresh configuration
pub const TEMPLATE_NAME: &str = "Plugin Template";

/// Render the starter configuration
pub fn render() -> String {
    format!(
        r#"# Archive name base. Must be unique to this plugin.
prefix = "{prefix}"
# Optional archive name suffix (<prefix>-<version>-<suffix>.zip)
suffix = ""

# Delete an existing archive of the same version instead of failing
force = false
# Allow packaging over an existing archive of the same version
overwrite = false

# Manifest output: "php" (manifest.php) or "json" (manifest.json)
manifest_format = "php"
# Filesystem backend: "native" or "shell"
fs_backend = "native"

# Paths removed from the staging directory after files are placed
clean = []
# File name patterns removed anywhere in the staging directory
globalClean = [".DS_Store", "*.swp"]

# Staging and output directories, relative to this file
[paths]
package = "package"
packages = "packages"

# Directory trees merged into the staging directory (source = destination)
[sync]
"src" = "src"

# Single files copied into the staging directory (source = destination)
[copy]

# Shell commands run with the staging directory as working directory
[hooks]
pre_build = []
post_build = []

[build]
commands = []

# Paths pushed to / pulled from a live installation by `sync` (source = remote)
[dev]

[manifest]
name = "{name}"
description = ""
author = ""
version = "1.0.0"
type = "module"
is_uninstallable = true
remove_tables = "prompt"
key = ""

[manifest.acceptable_sugar_versions]
regex_matches = []

[installdefs]
id = ""
copy = [
    {{ from = "<basepath>/src", to = "." }},
]
"#,
        prefix = TEMPLATE_PREFIX,
        name = TEMPLATE_NAME,
    )
}
