//! Config show subcommand
//!
//! Displays current configuration in table or JSON format.
//! Uses serde serialization so every Config field is included; nested
//! sections are flattened to dotted keys such as `image.base_tag`.

use anyhow::{Result, anyhow};
use assistant_bot_core::{Config, config};
use comfy_table::{Cell, Color, Table};
use serde_json::Value;

/// Values that make builds non-reproducible
const FLOATING_VALUES: &[(&str, &str)] = &[("image.base_tag", "latest")];

/// Show current configuration
pub fn cmd_config_show(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    show_table(config)
}

fn show_table(config: &Config) -> Result<()> {
    let value = serde_json::to_value(config)?;
    let Value::Object(obj) = value else {
        return Err(anyhow!("Config did not serialize to an object"));
    };

    let mut rows = Vec::new();
    flatten("", &obj, &mut rows);

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    for (key, val) in &rows {
        let display_value = format_value(val);
        table.add_row(vec![Cell::new(key), apply_cell_styling(key, val, display_value)]);
    }

    println!("{table}");

    if let Some(path) = config::paths::get_config_path() {
        println!();
        println!("Config file: {}", path.display());
    }

    Ok(())
}

/// Flatten nested objects into `section.key` rows, keeping maps like
/// `image.env` whole
fn flatten(prefix: &str, obj: &serde_json::Map<String, Value>, rows: &mut Vec<(String, Value)>) {
    for (key, val) in obj {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) if prefix.is_empty() && key != "env" => {
                flatten(&full_key, inner, rows);
            }
            _ => rows.push((full_key, val.clone())),
        }
    }
}

/// Format a JSON value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "(not set)".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => format_array(arr),
        Value::Object(map) => format_map(map),
    }
}

fn format_array(arr: &[Value]) -> String {
    if arr.is_empty() {
        return "(none)".to_string();
    }

    arr.iter()
        .filter_map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_map(map: &serde_json::Map<String, Value>) -> String {
    if map.is_empty() {
        return "(none)".to_string();
    }

    map.iter()
        .map(|(k, v)| format!("{k}={}", v.as_str().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Highlight values that make builds drift over time
fn apply_cell_styling(key: &str, value: &Value, display_value: String) -> Cell {
    let is_floating = FLOATING_VALUES
        .iter()
        .any(|(field, floating)| key == *field && value.as_str() == Some(*floating));

    if is_floating {
        return Cell::new(display_value).fg(Color::Yellow);
    }

    Cell::new(display_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_for(config: &Config) -> Vec<(String, Value)> {
        let Value::Object(obj) = serde_json::to_value(config).unwrap() else {
            panic!("config should serialize to an object");
        };
        let mut rows = Vec::new();
        flatten("", &obj, &mut rows);
        rows
    }

    #[test]
    fn test_flatten_uses_dotted_keys() {
        let rows = rows_for(&Config::default());
        let keys: Vec<_> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"version"));
        assert!(keys.contains(&"upcoming_days"));
        assert!(keys.contains(&"image.base_image"));
        assert!(keys.contains(&"image.env"));
        assert!(!keys.contains(&"image"));
    }

    #[test]
    fn test_format_value_shows_not_set_for_null() {
        assert_eq!(format_value(&Value::Null), "(not set)");
    }

    #[test]
    fn test_format_value_joins_command_tokens() {
        let val = serde_json::json!(["python", "main.py"]);
        assert_eq!(format_value(&val), "python main.py");
    }

    #[test]
    fn test_format_value_renders_env_pairs() {
        let val = serde_json::json!({"PYTHONUNBUFFERED": "1", "LANG": "C.UTF-8"});
        let rendered = format_value(&val);
        assert!(rendered.contains("PYTHONUNBUFFERED=1"));
        assert!(rendered.contains("LANG=C.UTF-8"));
    }

    #[test]
    fn test_format_value_shows_none_for_empty_array() {
        assert_eq!(format_value(&Value::Array(vec![])), "(none)");
    }
}
