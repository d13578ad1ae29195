//! Loading column definitions from JSON.
//!
//! ```json
//! [
//!   { "type": "rowNumber" },
//!   { "field": "name", "header": "Name", "editable": true },
//!   { "type": "array", "field": "tags", "editable": { "allowAdditions": true } }
//! ]
//! ```
//!
//! `type` defaults to `text`. Formatters and derived accessors cannot be
//! expressed in JSON; attach them to the loaded definitions in code.

use datagrid_model::ColumnType;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::def::{
    ArrayColumn, BooleanColumn, ColumnCommon, ColumnDef, DateColumn, Editable, FieldAccessor,
    ListColumn, NumberColumn, RowNumberColumn, TextColumn,
};
use crate::error::ColumnError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawColumnDef {
    #[serde(default, rename = "type")]
    column_type: ColumnType,
    field: Option<String>,
    header: Option<String>,
    #[serde(default)]
    detail: bool,
    #[serde(default)]
    primary: bool,
    sortable: Option<bool>,
    filterable: Option<bool>,
    #[serde(alias = "headerIcon")]
    header_icon_class: Option<String>,
    date_format: Option<String>,
    max_length: Option<usize>,
    placeholder: Option<String>,
    items: Option<Vec<String>>,
    #[serde(default)]
    editable: Value,
}

impl RawColumnDef {
    fn into_def(self, position: String) -> Result<ColumnDef, ColumnError> {
        let common = ColumnCommon {
            header: self.header,
            detail: self.detail,
            primary: self.primary,
            sortable: self.sortable,
            filterable: self.filterable,
            header_icon: self.header_icon_class,
            formatter: None,
        };

        if self.column_type == ColumnType::RowNumber {
            return Ok(RowNumberColumn { common }.into());
        }

        let field: FieldAccessor = match self.field {
            Some(field) if !field.is_empty() => field.into(),
            _ => {
                return Err(ColumnError::MissingField {
                    position,
                    column_type: self.column_type,
                });
            }
        };
        let editable = self.editable;

        let def = match self.column_type {
            ColumnType::RowNumber | ColumnType::Text => TextColumn {
                common,
                field,
                editable: editable_flag(editable, &position)?,
                max_length: self.max_length,
                placeholder: self.placeholder,
            }
            .into(),
            ColumnType::Boolean => BooleanColumn {
                common,
                field,
                editable: editable_flag(editable, &position)?,
            }
            .into(),
            ColumnType::Date => DateColumn {
                common,
                field,
                date_format: self.date_format,
                editable: editable_options(editable, &position)?,
            }
            .into(),
            ColumnType::Number => NumberColumn {
                common,
                field,
                editable: editable_options(editable, &position)?,
            }
            .into(),
            ColumnType::List => ListColumn {
                common,
                field,
                items: self.items,
                editable: editable_options(editable, &position)?,
            }
            .into(),
            ColumnType::Array => ArrayColumn {
                common,
                field,
                items: self.items,
                editable: editable_options(editable, &position)?,
            }
            .into(),
        };
        Ok(def)
    }
}

/// `editable` for columns without options: an options object counts as on.
fn editable_flag(value: Value, position: &str) -> Result<bool, ColumnError> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(enabled) => Ok(enabled),
        Value::Object(_) => Ok(true),
        other => serde_json::from_value::<bool>(other).map_err(|source| {
            ColumnError::InvalidEditable {
                position: position.to_string(),
                source,
            }
        }),
    }
}

fn editable_options<T: DeserializeOwned>(
    value: Value,
    position: &str,
) -> Result<Editable<T>, ColumnError> {
    match value {
        Value::Null | Value::Bool(false) => Ok(Editable::Disabled),
        Value::Bool(true) => Ok(Editable::Enabled),
        other => serde_json::from_value(other)
            .map(Editable::With)
            .map_err(|source| ColumnError::InvalidEditable {
                position: position.to_string(),
                source,
            }),
    }
}

fn describe_position(index: usize, raw: &RawColumnDef) -> String {
    match (&raw.header, &raw.field) {
        (Some(header), _) => format!("#{index} \"{header}\""),
        (None, Some(field)) => format!("#{index} \"{field}\""),
        (None, None) => format!("#{index}"),
    }
}

/// Load a column schema from a JSON array.
pub fn columns_from_json(json: &str) -> Result<Vec<ColumnDef>, ColumnError> {
    let value: Value = serde_json::from_str(json).map_err(|source| ColumnError::Json { source })?;
    columns_from_value(value)
}

/// Load a column schema from an already-parsed JSON array.
pub fn columns_from_value(value: Value) -> Result<Vec<ColumnDef>, ColumnError> {
    let raws: Vec<RawColumnDef> =
        serde_json::from_value(value).map_err(|source| ColumnError::Json { source })?;
    raws.into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let position = describe_position(index, &raw);
            raw.into_def(position)
        })
        .collect()
}

impl<'de> Deserialize<'de> for ColumnDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawColumnDef::deserialize(deserializer)?;
        let position = describe_position(0, &raw);
        raw.into_def(position).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::ArrayEditOptions;
    use serde_json::json;

    #[test]
    fn test_type_defaults_to_text() {
        let columns = columns_from_value(json!([{ "field": "name" }])).unwrap();
        assert_eq!(columns[0].column_type(), ColumnType::Text);
        assert!(!columns[0].is_editable());
    }

    #[test]
    fn test_full_schema() {
        let columns = columns_from_json(
            r##"[
                {"type": "rowNumber", "header": "#"},
                {"field": "name", "editable": true, "maxLength": 40},
                {"type": "date", "field": "due", "dateFormat": "YYYY", "editable": {"minDate": "2024-01-01"}},
                {"type": "array", "field": "tags", "items": ["a"], "editable": {"allowAdditions": true}},
                {"type": "boolean", "field": "done", "headerIconClass": "ri-check"}
            ]"##,
        )
        .unwrap();
        assert_eq!(columns.len(), 5);
        assert!(columns[0].field().is_none());
        assert!(columns[1].is_editable());
        match &columns[3] {
            ColumnDef::Array(c) => {
                assert_eq!(
                    c.editable,
                    Editable::With(ArrayEditOptions {
                        allow_additions: true,
                        items: None,
                    })
                );
                assert_eq!(c.items, Some(vec!["a".to_string()]));
            }
            other => panic!("unexpected column {other:?}"),
        }
        assert_eq!(columns[4].common().header_icon.as_deref(), Some("ri-check"));
    }

    #[test]
    fn test_missing_field_is_reported() {
        let err = columns_from_value(json!([{"field": "a"}, {"type": "number", "header": "Qty"}]))
            .unwrap_err();
        match err {
            ColumnError::MissingField {
                position,
                column_type,
            } => {
                assert_eq!(position, "#1 \"Qty\"");
                assert_eq!(column_type, ColumnType::Number);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_editable() {
        let err = columns_from_value(json!([{"type": "number", "field": "n", "editable": {"min": "low"}}]))
            .unwrap_err();
        assert!(matches!(err, ColumnError::InvalidEditable { .. }));
        assert!(err.user_message().contains("#0"));
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(
            columns_from_json("{\"field\": \"x\"}"),
            Err(ColumnError::Json { .. })
        ));
    }

    #[test]
    fn test_single_column_deserialize() {
        let column: ColumnDef = serde_json::from_value(json!({"type": "list", "field": "s"})).unwrap();
        assert_eq!(column.column_type(), ColumnType::List);
        assert!(serde_json::from_value::<ColumnDef>(json!({"type": "date"})).is_err());
    }
}
