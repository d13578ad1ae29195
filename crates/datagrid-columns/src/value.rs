//! Value display helpers.

use datagrid_model::Row;
use serde_json::Value;

static NULL: Value = Value::Null;

/// Read a field from a row; absent fields read as `null`.
#[inline]
pub fn value_at<'r>(row: &'r Row, key: &str) -> &'r Value {
    row.get(key).unwrap_or(&NULL)
}

/// Plain-text rendering of a cell value.
///
/// Strings render as-is, `null` as the empty string, arrays as their items
/// joined with `", "`, objects as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}
