// src/config/mappings.rs

//! Source-to-destination mappings (`sync`, `copy`, `dev`)
//!
//! A mapping key accepts either a table (`"src/x" = "custom/x"`, kept in
//! file order) or an array whose elements are bare strings (source and
//! destination are the same path) or `{ from, to }` tables.

use super::Config;
use crate::error::{Error, Result};
use toml::Value;

/// A single source -> destination pair, both relative paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    pub from: String,
    pub to: String,
}

impl FileMapping {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Read the mappings stored under `key`; an absent key yields no mappings
pub fn mappings(config: &Config, key: &str) -> Result<Vec<FileMapping>> {
    match config.lookup(key) {
        None => Ok(Vec::new()),
        Some(Value::Table(table)) => table
            .iter()
            .map(|(from, to)| {
                to.as_str()
                    .map(|to| FileMapping::new(from.as_str(), to))
                    .ok_or_else(|| Error::type_mismatch(format!("{}.{}", key, from), "a string"))
            })
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| array_entry(key, index, item))
            .collect(),
        Some(_) => Err(Error::type_mismatch(key, "a table or an array")),
    }
}

fn array_entry(key: &str, index: usize, item: &Value) -> Result<FileMapping> {
    match item {
        Value::String(path) => Ok(FileMapping::new(path.as_str(), path.as_str())),
        Value::Table(table) => {
            let field = |name: &str| {
                table
                    .get(name)
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::MissingKey(format!("{}[{}].{}", key, index, name)))
            };
            Ok(FileMapping::new(field("from")?, field("to")?))
        }
        _ => Err(Error::type_mismatch(
            format!("{}[{}]", key, index),
            "a string or a { from, to } table",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(content: &str) -> Config {
        Config::parse("/plugin", content).unwrap()
    }

    #[test]
    fn test_table_mappings_keep_file_order() {
        let config = config(
            r#"
[sync]
"src" = "src"
"vendor/lib" = "custom/include/lib"
"assets" = "custom/themes/default"
"#,
        );
        let sync = mappings(&config, "sync").unwrap();
        assert_eq!(
            sync,
            vec![
                FileMapping::new("src", "src"),
                FileMapping::new("vendor/lib", "custom/include/lib"),
                FileMapping::new("assets", "custom/themes/default"),
            ]
        );
    }

    #[test]
    fn test_array_mappings() {
        let config = config(
            r#"
copy = [
    "LICENSE",
    { from = "docs/README.md", to = "README.txt" },
]
"#,
        );
        let copy = mappings(&config, "copy").unwrap();
        assert_eq!(copy[0], FileMapping::new("LICENSE", "LICENSE"));
        assert_eq!(copy[1], FileMapping::new("docs/README.md", "README.txt"));
    }

    #[test]
    fn test_absent_key_is_empty() {
        let config = config("prefix = \"acme\"\n");
        assert!(mappings(&config, "sync").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_entries() {
        let config = config(
            r#"
sync = "src"
copy = [{ from = "a" }]
dev = [1]
"#,
        );
        assert!(matches!(
            mappings(&config, "sync"),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            mappings(&config, "copy"),
            Err(Error::MissingKey(ref k)) if k == "copy[0].to"
        ));
        assert!(matches!(
            mappings(&config, "dev"),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
