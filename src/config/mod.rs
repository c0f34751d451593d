// src/config/mod.rs

//! Plugin configuration (plugin.toml)
//!
//! The configuration is a nested TOML table addressed with dot-notation keys
//! (`manifest.version`, `installdefs.copy`). The pipeline reads most keys and
//! writes back a handful of derived ones during manifest generation, so the
//! tree is held by value and mutated in place for the lifetime of one run.
//!
//! Derived locations (staging dir, output dir, manifest file) are pure
//! functions in [`crate::paths`].

mod mappings;
pub mod template;

pub use mappings::{FileMapping, mappings};

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::debug;

/// Name of the configuration file at the plugin root
pub const CONFIG_FILE: &str = "plugin.toml";

/// Plugin configuration tree plus the root it was loaded from
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    tree: Table,
}

impl Config {
    /// Build a configuration from an in-memory table
    pub fn from_table(root: impl Into<PathBuf>, tree: Table) -> Self {
        Self {
            root: root.into(),
            tree,
        }
    }

    /// Parse configuration content; `root` is the plugin root directory
    pub fn parse(root: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let root = root.into();
        let tree: Table = content.parse().map_err(|source| Error::Parse {
            path: root.join(CONFIG_FILE),
            source,
        })?;
        Ok(Self { root, tree })
    }

    /// Load configuration from a file; the file's directory becomes the root
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let root = std::path::absolute(parent)?;
        let tree: Table = content.parse().map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(Self { root, tree })
    }

    /// Find `plugin.toml` in `start` or its nearest ancestor and load it
    pub fn discover(start: &Path) -> Result<Self> {
        let start = std::path::absolute(start)?;
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
        }
        Err(Error::InvalidPath(format!(
            "no {} found in {} or any parent directory",
            CONFIG_FILE,
            start.display()
        )))
    }

    /// Plugin root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a dotted key, returning `None` when any segment is absent
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.tree.get(first)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }

    /// Read a key that must be present
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.lookup(key).ok_or_else(|| Error::MissingKey(key.to_string()))
    }

    /// Read a key, falling back to `default` when absent
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.lookup(key).cloned().unwrap_or(default)
    }

    /// Read a string key that must be present
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| Error::type_mismatch(key, "a string"))
    }

    /// Read an optional string key
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str> {
        match self.lookup(key) {
            None => Ok(default),
            Some(value) => value
                .as_str()
                .ok_or_else(|| Error::type_mismatch(key, "a string")),
        }
    }

    /// Read an optional boolean key
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.lookup(key) {
            None => Ok(default),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| Error::type_mismatch(key, "a boolean")),
        }
    }

    /// Read an optional list of strings; an absent key is an empty list
    pub fn str_list(&self, key: &str) -> Result<Vec<String>> {
        let Some(value) = self.lookup(key) else {
            return Ok(Vec::new());
        };
        let items = value
            .as_array()
            .ok_or_else(|| Error::type_mismatch(key, "a list of strings"))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::type_mismatch(key, "a list of strings"))
            })
            .collect()
    }

    /// Write a value at a dotted key, creating intermediate tables
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let segments: Vec<&str> = key.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::MissingKey(key.to_string()));
        };

        let mut table = &mut self.tree;
        for (depth, segment) in parents.iter().enumerate() {
            let entry = table
                .entry(segment.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            table = entry.as_table_mut().ok_or_else(|| {
                Error::type_mismatch(segments[..=depth].join("."), "a table")
            })?;
        }

        table.insert(last.to_string(), value.into());
        Ok(())
    }

    /// True when the key is absent or holds an empty/falsy value
    ///
    /// Empty strings, `"0"`, zero, `false`, and empty arrays or tables all
    /// count as empty.
    pub fn is_empty(&self, key: &str) -> bool {
        match self.lookup(key) {
            None => true,
            Some(Value::String(s)) => s.is_empty() || s == "0",
            Some(Value::Integer(i)) => *i == 0,
            Some(Value::Float(f)) => *f == 0.0,
            Some(Value::Boolean(b)) => !b,
            Some(Value::Array(a)) => a.is_empty(),
            Some(Value::Table(t)) => t.is_empty(),
            Some(Value::Datetime(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Config {
        Config::parse(
            "/plugin",
            r#"
prefix = "acme"
force = true
clean = ["docs", "tests"]

[manifest]
name = "Acme"
version = "1.2.0"
key = ""

[manifest.acceptable_sugar_versions]
regex_matches = ["7\\..*"]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_get_nested_key() {
        let config = sample();
        assert_eq!(config.get_str("manifest.version").unwrap(), "1.2.0");
        assert_eq!(config.get_str("prefix").unwrap(), "acme");
        assert!(config.get("manifest.acceptable_sugar_versions.regex_matches").is_ok());
    }

    #[test]
    fn test_from_table() {
        let mut tree = Table::new();
        tree.insert("prefix".to_string(), Value::String("acme".to_string()));

        let mut config = Config::from_table("/plugin", tree);
        assert_eq!(config.root(), Path::new("/plugin"));
        assert_eq!(config.get_str("prefix").unwrap(), "acme");

        config.set("manifest.version", "1.0").unwrap();
        assert_eq!(config.get_str("manifest.version").unwrap(), "1.0");
    }

    #[test]
    fn test_get_missing_key_fails() {
        let config = sample();
        let err = config.get("manifest.author").unwrap_err();
        assert!(matches!(err, Error::MissingKey(ref k) if k == "manifest.author"));

        // Walking through a scalar is also a miss
        assert!(config.lookup("prefix.inner").is_none());
    }

    #[test]
    fn test_get_with_default() {
        let config = sample();
        assert_eq!(config.get_str_or("suffix", "").unwrap(), "");
        assert!(!config.get_bool_or("overwrite", false).unwrap());
        assert!(config.get_bool_or("force", false).unwrap());
        assert_eq!(
            config.get_or("missing", Value::Integer(7)),
            Value::Integer(7)
        );
    }

    #[test]
    fn test_type_mismatch() {
        let config = sample();
        assert!(matches!(
            config.get_bool_or("prefix", false),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            config.str_list("manifest"),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_set_creates_intermediate_tables() {
        let mut config = sample();
        config.set("installdefs.id", "acme").unwrap();
        config.set("manifest.published_date", "2024-01-01 00:00:00").unwrap();

        assert_eq!(config.get_str("installdefs.id").unwrap(), "acme");
        assert_eq!(
            config.get_str("manifest.published_date").unwrap(),
            "2024-01-01 00:00:00"
        );
        // Existing siblings are untouched
        assert_eq!(config.get_str("manifest.name").unwrap(), "Acme");
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut config = sample();
        let err = config.set("prefix.inner", "x").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { ref key, .. } if key == "prefix"));
    }

    #[test]
    fn test_is_empty() {
        let mut config = sample();
        assert!(config.is_empty("manifest.key"));
        assert!(config.is_empty("installdefs.id"));
        assert!(!config.is_empty("prefix"));
        assert!(!config.is_empty("clean"));

        config.set("zero", "0").unwrap();
        config.set("off", false).unwrap();
        config.set("none", Value::Array(Vec::new())).unwrap();
        assert!(config.is_empty("zero"));
        assert!(config.is_empty("off"));
        assert!(config.is_empty("none"));
    }

    #[test]
    fn test_str_list() {
        let config = sample();
        assert_eq!(config.str_list("clean").unwrap(), vec!["docs", "tests"]);
        assert!(config.str_list("globalClean").unwrap().is_empty());
    }

    #[test]
    fn test_load_sets_root_to_parent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "prefix = \"acme\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.root(), temp_dir.path());
        assert_eq!(config.get_str("prefix").unwrap(), "acme");
    }

    #[test]
    fn test_load_reports_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "prefix = \n").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "prefix = \"acme\"\n").unwrap();
        let nested = temp_dir.path().join("src/modules/Acme");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::discover(&nested).unwrap();
        assert_eq!(config.root(), temp_dir.path());
    }

    #[test]
    fn test_discover_without_config_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::discover(temp_dir.path());
        assert!(matches!(result, Err(Error::InvalidPath(_))));
    }
}
