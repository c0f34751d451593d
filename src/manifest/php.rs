// src/manifest/php.rs

//! PHP `var_export` rendering of TOML values
//!
//! The host installer `include`s the manifest file, so the output must be
//! valid PHP and match the layout `var_export` produces:
//!
//! ```text
//! array (
//!   'name' => 'Acme',
//!   'copy' => 
//!   array (
//!     0 => 
//!     array (
//!       'from' => '<basepath>/src/a.php',
//!     ),
//!   ),
//! )
//! ```

use toml::Value;

/// Render the complete manifest file from the `manifest` and `installdefs`
/// values
pub fn render_file(manifest: &Value, installdefs: &Value) -> String {
    format!(
        "<?php\n\n$manifest = {};\n\n$installdefs = {};\n",
        export(manifest),
        export(installdefs)
    )
}

/// Render a single value the way `var_export` does
pub fn export(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::String(s) => out.push_str(&quote(s)),
        Value::Integer(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&float(*f)),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Datetime(dt) => out.push_str(&quote(&dt.to_string())),
        Value::Array(items) => {
            let entries = items
                .iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item));
            write_array(out, entries, indent);
        }
        Value::Table(table) => {
            let entries = table.iter().map(|(k, v)| (quote(k), v));
            write_array(out, entries, indent);
        }
    }
}

fn write_array<'a>(
    out: &mut String,
    entries: impl Iterator<Item = (String, &'a Value)>,
    indent: usize,
) {
    let inner = " ".repeat(indent + 2);
    out.push_str("array (\n");
    for (key, value) in entries {
        out.push_str(&inner);
        out.push_str(&key);
        out.push_str(" => ");
        if matches!(value, Value::Array(_) | Value::Table(_)) {
            out.push('\n');
            out.push_str(&inner);
            write_value(out, value, indent + 2);
        } else {
            write_value(out, value, indent + 2);
        }
        out.push_str(",\n");
    }
    out.push_str(&" ".repeat(indent));
    out.push(')');
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn float(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "INF" } else { "-INF" }.to_string()
    } else if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}
