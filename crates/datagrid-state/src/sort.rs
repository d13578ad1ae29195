//! Cell value ordering.

use std::cmp::Ordering;

use datagrid_columns::{display_value, parse_date_value};
use datagrid_model::ColumnType;
use serde_json::Value;

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Compare two cells of one column.
///
/// Absent values (`null`, `""`) sort after everything else in both
/// directions; `desc` only reverses the order of present values.
pub fn compare_cells(column_type: ColumnType, a: &Value, b: &Value, desc: bool) -> Ordering {
    match (is_absent(a), is_absent(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = compare_present(column_type, a, b);
            if desc { ordering.reverse() } else { ordering }
        }
    }
}

fn compare_present(column_type: ColumnType, a: &Value, b: &Value) -> Ordering {
    if column_type == ColumnType::Date
        && let (Some(a), Some(b)) = (parse_date_value(a), parse_date_value(b))
    {
        return a.cmp(&b);
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.total_cmp(&y)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => display_value(a)
            .to_lowercase()
            .cmp(&display_value(b).to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(
            compare_cells(ColumnType::Number, &json!(9), &json!(10), false),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(ColumnType::Number, &json!(9), &json!(10), true),
            Ordering::Greater
        );
    }

    #[test]
    fn test_strings_ignore_case() {
        assert_eq!(
            compare_cells(ColumnType::Text, &json!("apple"), &json!("Banana"), false),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(ColumnType::Text, &json!("ABC"), &json!("abc"), false),
            Ordering::Equal
        );
    }

    #[test]
    fn test_booleans() {
        assert_eq!(
            compare_cells(ColumnType::Boolean, &json!(false), &json!(true), false),
            Ordering::Less
        );
    }

    #[test]
    fn test_absent_values_last_in_both_directions() {
        for desc in [false, true] {
            assert_eq!(
                compare_cells(ColumnType::Text, &json!(null), &json!("a"), desc),
                Ordering::Greater
            );
            assert_eq!(
                compare_cells(ColumnType::Text, &json!("a"), &json!(""), desc),
                Ordering::Less
            );
        }
    }

    #[test]
    fn test_dates_compare_chronologically() {
        assert_eq!(
            compare_cells(
                ColumnType::Date,
                &json!("2024-02-01T00:00:00+05:00"),
                &json!("2024-01-31T20:00:00Z"),
                false
            ),
            Ordering::Less
        );
    }
}
