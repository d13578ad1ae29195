//! Column filter functions.
//!
//! Each column type has a default filter function and a set of functions a
//! host may switch to. A blank filter value (`""`, `null`, `[]`) matches
//! every row.

use std::fmt;
use std::str::FromStr;

use datagrid_columns::{display_value, parse_date_value};
use datagrid_model::ColumnType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named filter function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterFn {
    /// Case-insensitive substring.
    IncludesString,
    /// Case-insensitive equality.
    EqualsString,
    /// Equality; numbers and booleans compare by value.
    Equals,
    /// `[min, max]`, either bound may be blank.
    InNumberRange,
    /// `[start, end]` dates, either bound may be blank.
    InDateRange,
    /// The cell's items contain the filter value.
    ArrIncludes,
    /// The cell's items contain every filter value.
    ArrIncludesAll,
    /// The cell's items contain at least one filter value.
    ArrIncludesSome,
}

impl FilterFn {
    pub const ALL: [FilterFn; 8] = [
        Self::IncludesString,
        Self::EqualsString,
        Self::Equals,
        Self::InNumberRange,
        Self::InDateRange,
        Self::ArrIncludes,
        Self::ArrIncludesAll,
        Self::ArrIncludesSome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncludesString => "includesString",
            Self::EqualsString => "equalsString",
            Self::Equals => "equals",
            Self::InNumberRange => "inNumberRange",
            Self::InDateRange => "inDateRange",
            Self::ArrIncludes => "arrIncludes",
            Self::ArrIncludesAll => "arrIncludesAll",
            Self::ArrIncludesSome => "arrIncludesSome",
        }
    }

    /// Default function for a column type. `None` for row-number columns.
    pub fn default_for(column_type: ColumnType) -> Option<Self> {
        match column_type {
            ColumnType::RowNumber => None,
            ColumnType::Text | ColumnType::Date => Some(Self::IncludesString),
            ColumnType::Number | ColumnType::Boolean => Some(Self::Equals),
            ColumnType::List | ColumnType::Array => Some(Self::ArrIncludes),
        }
    }

    /// Functions offered for a column type.
    pub fn available_for(column_type: ColumnType) -> &'static [FilterFn] {
        match column_type {
            ColumnType::RowNumber => &[],
            ColumnType::Text => &[Self::IncludesString, Self::EqualsString],
            ColumnType::Number => &[Self::Equals, Self::InNumberRange],
            ColumnType::Date => &[Self::Equals, Self::InDateRange],
            ColumnType::Boolean => &[Self::Equals],
            ColumnType::List | ColumnType::Array => &[
                Self::ArrIncludes,
                Self::ArrIncludesAll,
                Self::ArrIncludesSome,
            ],
        }
    }

    /// Whether `cell` passes `filter`.
    pub fn matches(&self, cell: &Value, filter: &Value) -> bool {
        if is_blank(filter) {
            return true;
        }
        match self {
            Self::IncludesString => display_value(cell)
                .to_lowercase()
                .contains(&display_value(filter).to_lowercase()),
            Self::EqualsString => {
                display_value(cell).to_lowercase() == display_value(filter).to_lowercase()
            }
            Self::Equals => loose_eq(cell, filter),
            Self::InNumberRange => {
                let (min, max) = bounds(filter, as_number);
                in_range(as_number(cell), min, max)
            }
            Self::InDateRange => {
                let (start, end) = bounds(filter, parse_date_value);
                in_range(parse_date_value(cell), start, end)
            }
            Self::ArrIncludes => items(cell).iter().any(|item| loose_eq(item, filter)),
            Self::ArrIncludesAll => {
                let have = items(cell);
                items(filter)
                    .iter()
                    .all(|wanted| have.iter().any(|item| loose_eq(item, wanted)))
            }
            Self::ArrIncludesSome => {
                let have = items(cell);
                items(filter)
                    .iter()
                    .any(|wanted| have.iter().any(|item| loose_eq(item, wanted)))
            }
        }
    }
}

impl fmt::Display for FilterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterFn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| format!("unknown filter function '{s}'"))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Equality that lets a typed cell match a filter typed in as text.
fn loose_eq(cell: &Value, filter: &Value) -> bool {
    match cell {
        Value::Number(_) => as_number(cell) == as_number(filter),
        Value::Bool(b) => as_bool(filter) == Some(*b),
        Value::Null => false,
        _ => cell == filter || display_value(cell) == display_value(filter),
    }
}

/// Items of a multi-valued cell; a scalar is one item.
fn items(value: &Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// `[lo, hi]` from a filter value. A bound that does not parse is open.
fn bounds<T>(filter: &Value, parse: impl Fn(&Value) -> Option<T>) -> (Option<T>, Option<T>) {
    match filter {
        Value::Array(pair) => (
            pair.first().and_then(&parse),
            pair.get(1).and_then(&parse),
        ),
        other => (parse(other), None),
    }
}

fn in_range<T: PartialOrd>(value: Option<T>, lo: Option<T>, hi: Option<T>) -> bool {
    if lo.is_none() && hi.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    lo.is_none_or(|lo| value >= lo) && hi.is_none_or(|hi| value <= hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_per_type() {
        assert_eq!(FilterFn::default_for(ColumnType::Text), Some(FilterFn::IncludesString));
        assert_eq!(FilterFn::default_for(ColumnType::Date), Some(FilterFn::IncludesString));
        assert_eq!(FilterFn::default_for(ColumnType::Number), Some(FilterFn::Equals));
        assert_eq!(FilterFn::default_for(ColumnType::Boolean), Some(FilterFn::Equals));
        assert_eq!(FilterFn::default_for(ColumnType::List), Some(FilterFn::ArrIncludes));
        assert_eq!(FilterFn::default_for(ColumnType::RowNumber), None);
        assert!(FilterFn::available_for(ColumnType::RowNumber).is_empty());
        assert!(FilterFn::available_for(ColumnType::Date).contains(&FilterFn::InDateRange));
    }

    #[test]
    fn test_blank_matches_everything() {
        for f in FilterFn::ALL {
            assert!(f.matches(&json!("x"), &json!("")));
            assert!(f.matches(&json!(null), &json!(null)));
            assert!(f.matches(&json!([1]), &json!([])));
        }
    }

    #[test]
    fn test_string_filters() {
        assert!(FilterFn::IncludesString.matches(&json!("Hello World"), &json!("wor")));
        assert!(!FilterFn::IncludesString.matches(&json!("Hello"), &json!("bye")));
        assert!(FilterFn::EqualsString.matches(&json!("Hello"), &json!("hello")));
        assert!(!FilterFn::EqualsString.matches(&json!("Hello!"), &json!("hello")));
    }

    #[test]
    fn test_equals_coerces_typed_cells() {
        assert!(FilterFn::Equals.matches(&json!(42), &json!("42")));
        assert!(FilterFn::Equals.matches(&json!(1.5), &json!(1.5)));
        assert!(FilterFn::Equals.matches(&json!(true), &json!("true")));
        assert!(!FilterFn::Equals.matches(&json!(false), &json!(true)));
        assert!(!FilterFn::Equals.matches(&json!(null), &json!("x")));
    }

    #[test]
    fn test_number_range() {
        let f = FilterFn::InNumberRange;
        assert!(f.matches(&json!(5), &json!([1, 10])));
        assert!(f.matches(&json!(5), &json!(["", 5])));
        assert!(!f.matches(&json!(11), &json!([null, 10])));
        assert!(!f.matches(&json!("n/a"), &json!([1, 10])));
        assert!(f.matches(&json!("n/a"), &json!(["", ""])));
    }

    #[test]
    fn test_date_range() {
        let f = FilterFn::InDateRange;
        let range = json!(["2024-01-01", "2024-12-31"]);
        assert!(f.matches(&json!("2024-06-01T12:00:00Z"), &range));
        assert!(!f.matches(&json!("2025-01-02"), &range));
        assert!(!f.matches(&json!("someday"), &range));
    }

    #[test]
    fn test_array_filters() {
        let cell = json!(["a", "b", "c"]);
        assert!(FilterFn::ArrIncludes.matches(&cell, &json!("b")));
        assert!(!FilterFn::ArrIncludes.matches(&cell, &json!("z")));
        assert!(FilterFn::ArrIncludesAll.matches(&cell, &json!(["a", "c"])));
        assert!(!FilterFn::ArrIncludesAll.matches(&cell, &json!(["a", "z"])));
        assert!(FilterFn::ArrIncludesSome.matches(&cell, &json!(["z", "c"])));
        assert!(!FilterFn::ArrIncludesSome.matches(&cell, &json!(["y", "z"])));
        // List cells hold one value.
        assert!(FilterFn::ArrIncludes.matches(&json!("open"), &json!("open")));
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for f in FilterFn::ALL {
            assert_eq!(f.as_str().parse::<FilterFn>(), Ok(f));
        }
        assert!("fuzzy".parse::<FilterFn>().is_err());
    }
}
