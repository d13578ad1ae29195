//! Reading columns, rows and options from files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use datagrid_columns::{ColumnDef, columns_from_json};
use datagrid_model::{GridOptions, Row};
use datagrid_persistence::AutoSaveConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contents of an options file.
///
/// Grid options sit at the top level; autosave timing under `[autosave]`.
///
/// ```toml
/// id = "orders"
/// titleField = "name"
///
/// [persist]
/// storage = "localstorage"
///
/// [persist.state]
/// columnVisibility = true
///
/// [autosave]
/// debounceMs = 250
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    #[serde(flatten)]
    pub grid: GridOptions,
    pub autosave: AutoSaveConfig,
}

impl HostConfig {
    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid options file")
    }

    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("read options {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parse options {}", path.display()))
    }
}

pub fn load_columns(path: &Path) -> Result<Vec<ColumnDef>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read columns {}", path.display()))?;
    let columns =
        columns_from_json(&text).with_context(|| format!("parse columns {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = columns.len(), "loaded column schema");
    Ok(columns)
}

/// Load rows from a `.csv` file or a JSON array of objects.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let text = fs::read_to_string(path).with_context(|| format!("read rows {}", path.display()))?;
    let rows = if is_csv {
        rows_from_csv(&text)
    } else {
        rows_from_json(&text)
    }
    .with_context(|| format!("parse rows {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = rows.len(), "loaded rows");
    Ok(rows)
}

pub fn rows_from_json(text: &str) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        bail!("rows must be a JSON array of objects");
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(row) => Ok(row),
            other => bail!("row #{index} is not an object: {other}"),
        })
        .collect()
}

/// Parse CSV with a header row. Cell values are inferred with
/// [`infer_value`].
pub fn rows_from_csv(text: &str) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("CSV record #{index}"))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), infer_value(cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Interpret command-line or CSV text: empty is null; JSON numbers,
/// booleans and arrays are taken as such; anything else is a string.
pub fn infer_value(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Array(_))) => value,
        _ => Value::String(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid_model::StorageBackend;
    use serde_json::json;

    #[test]
    fn test_infer_value() {
        assert_eq!(infer_value(""), Value::Null);
        assert_eq!(infer_value("42"), json!(42));
        assert_eq!(infer_value("true"), json!(true));
        assert_eq!(infer_value(r#"["a","b"]"#), json!(["a", "b"]));
        assert_eq!(infer_value("bob"), json!("bob"));
        assert_eq!(infer_value(r#"{"a":1}"#), json!(r#"{"a":1}"#));
    }

    #[test]
    fn test_rows_from_csv() {
        let rows = rows_from_csv("name, score ,tags\nalice,10,\"[\"\"x\"\"]\"\nbob,,\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["score"], json!(10));
        assert_eq!(rows[0]["tags"], json!(["x"]));
        assert_eq!(rows[1]["score"], Value::Null);
    }

    #[test]
    fn test_rows_from_json_rejects_non_objects() {
        assert!(rows_from_json(r#"[{"a":1}]"#).is_ok());
        assert!(rows_from_json(r#"[{"a":1}, 3]"#).is_err());
        assert!(rows_from_json(r#"{"a":1}"#).is_err());
    }

    #[test]
    fn test_host_config() {
        let config = HostConfig::from_toml(
            r#"
            id = "orders"
            titleField = "name"

            [persist]
            storage = "localstorage"

            [persist.state]
            columnVisibility = true

            [autosave]
            debounceMs = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.id.as_deref(), Some("orders"));
        assert_eq!(config.grid.title_field.as_deref(), Some("name"));
        assert_eq!(config.grid.persist.storage, StorageBackend::FlatKv);
        assert!(config.grid.persist.state.column_visibility);
        assert!(config.grid.persist.state.sorting);
        assert_eq!(config.autosave.debounce_ms, 250);
        assert_eq!(config.autosave.settle_ms, 100);

        assert_eq!(HostConfig::load(None).unwrap(), HostConfig::default());
    }
}
