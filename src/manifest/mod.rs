// src/manifest/mod.rs

//! Manifest generation
//!
//! The manifest is the file the host installer reads from the archive root.
//! It has two parts taken straight from the configuration tree:
//! - `manifest`: package metadata (name, version, author, ...)
//! - `installdefs`: install directives, notably `copy`
//!
//! Writing it is the last packaging stage and the only one that writes back
//! into the configuration: the publish timestamp, defaulted identifiers and
//! the expanded copy list all land in the tree before it is serialized.

mod php;

use crate::config::Config;
use crate::config::template::{TEMPLATE_NAME, TEMPLATE_PREFIX};
use crate::copyspec::{self, CopyDef};
use crate::error::{Error, Result};
use crate::paths;
use chrono::{DateTime, Local};
use std::fs;
use std::path::PathBuf;
use toml::Value;
use tracing::{debug, info};

/// Format of `manifest.published_date`
pub const PUBLISHED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialization format of the manifest file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `manifest.php`, PHP arrays in `var_export` layout
    Php,
    /// `manifest.json`, pretty-printed JSON
    Json,
}

impl ManifestFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "php" => Some(Self::Php),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Read `manifest_format`, defaulting to PHP
    pub fn from_config(config: &Config) -> Result<Self> {
        let name = config.get_str_or("manifest_format", "php")?;
        Self::parse(name).ok_or_else(|| {
            Error::ConfigValidation(format!(
                "unknown manifest_format '{}' (expected 'php' or 'json')",
                name
            ))
        })
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Php => "manifest.php",
            Self::Json => "manifest.json",
        }
    }
}

/// Generate and write the manifest, stamped with the current local time
pub fn write_manifest(config: &mut Config) -> Result<PathBuf> {
    write_manifest_at(config, Local::now())
}

/// Generate and write the manifest with an explicit publish time
///
/// Nothing is written when any step fails, but keys already stored in the
/// configuration by earlier steps stay there.
pub fn write_manifest_at(config: &mut Config, published: DateTime<Local>) -> Result<PathBuf> {
    set_published_date(config, published)?;
    validate(config)?;
    fill_defaults(config)?;
    build_copy(config)?;

    let path = paths::manifest_file(config)?;
    let content = render(config)?;
    fs::write(&path, content)
        .map_err(|e| Error::external("write manifest", format!("{}: {}", path.display(), e)))?;

    info!("Wrote manifest {}", path.display());
    Ok(path)
}

/// Store the publish timestamp at `manifest.published_date`
pub fn set_published_date(config: &mut Config, published: DateTime<Local>) -> Result<()> {
    let stamp = published.format(PUBLISHED_DATE_FORMAT).to_string();
    config.set("manifest.published_date", stamp)
}

/// Reject configurations that still carry template placeholders
pub fn validate(config: &Config) -> Result<()> {
    let prefix = config.get_str_or("prefix", "")?;
    if config.is_empty("prefix") {
        return Err(Error::ConfigValidation("missing prefix in plugin.toml".to_string()));
    }
    if prefix == TEMPLATE_PREFIX {
        return Err(Error::ConfigValidation(format!(
            "change prefix from '{}' to a name unique to this plugin",
            TEMPLATE_PREFIX
        )));
    }

    if config.get_str_or("manifest.name", "")? == TEMPLATE_NAME {
        return Err(Error::ConfigValidation(format!(
            "change manifest.name from '{}' to a name unique to this plugin",
            TEMPLATE_NAME
        )));
    }

    Ok(())
}

/// Default `manifest.key` and `installdefs.id` to the prefix when empty
pub fn fill_defaults(config: &mut Config) -> Result<()> {
    let prefix = config.get_str("prefix")?.to_string();
    for key in ["manifest.key", "installdefs.id"] {
        if config.is_empty(key) {
            debug!("Defaulting {} to '{}'", key, prefix);
            config.set(key, prefix.as_str())?;
        }
    }
    Ok(())
}

/// Expand `installdefs.copy` into file-level entries and store them back
pub fn build_copy(config: &mut Config) -> Result<()> {
    let defs = copy_defs(config)?;
    let base = paths::package_path(config)?;
    let expanded = copyspec::expand(&copyspec::resolve(defs, &base))?;
    debug!("installdefs.copy holds {} entries", expanded.len());

    let value = Value::try_from(&expanded).map_err(|e| Error::Serialize(e.to_string()))?;
    config.set("installdefs.copy", value)
}

fn copy_defs(config: &Config) -> Result<Vec<CopyDef>> {
    match config.lookup("installdefs.copy") {
        None => Ok(Vec::new()),
        Some(value) => value
            .clone()
            .try_into::<Vec<CopyDef>>()
            .map_err(|_| Error::type_mismatch("installdefs.copy", "a list of { from, to } tables")),
    }
}

/// Serialize `manifest` and `installdefs` in the configured format
pub fn render(config: &Config) -> Result<String> {
    let manifest = section(config, "manifest");
    let installdefs = section(config, "installdefs");

    match ManifestFormat::from_config(config)? {
        ManifestFormat::Php => Ok(php::render_file(&manifest, &installdefs)),
        ManifestFormat::Json => {
            let document = serde_json::json!({
                "manifest": to_json(&manifest),
                "installdefs": to_json(&installdefs),
            });
            let mut out = serde_json::to_string_pretty(&document)
                .map_err(|e| Error::Serialize(e.to_string()))?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn section(config: &Config, key: &str) -> Value {
    config.get_or(key, Value::Table(toml::Table::new()))
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::from(*f),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Table(table) => serde_json::Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}
