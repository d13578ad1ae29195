//! Dispatch descriptors.
//!
//! A [`ColumnDescriptor`] is everything the rendering layer needs to know
//! about a column. It is produced by the parser and never mutated.

use std::fmt;

use datagrid_model::{ColumnType, Row};
use serde_json::Value;

use crate::date::{DateFormat, render_date};
use crate::def::{CellContext, Formatter};
use crate::editor::{CellEditor, EditorCell, EditorKind, EditorSpec};
use crate::value::{display_value, value_at};

/// Maximum number of item badges before the rest collapse into `+N`.
pub const BADGE_LIMIT: usize = 3;

/// Column metadata carried alongside the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub icon: Option<String>,
    pub column_type: ColumnType,
    /// Show a detail button for this column.
    pub detail: bool,
    /// Candidate values for editors and filters.
    pub items: Option<Vec<String>>,
}

/// How a cell is produced.
#[derive(Clone)]
pub enum CellRenderer {
    /// 1-based index of the row in the original data.
    RowIndex,
    /// The raw value.
    Plain,
    /// A formatted date.
    Date(DateFormat),
    /// Up to [`BADGE_LIMIT`] badges plus an overflow badge.
    BadgeList,
    /// The value as a single badge.
    Badge,
    /// Host formatter.
    Formatted(Formatter),
    /// Editable cell.
    Editor(EditorSpec),
}

impl fmt::Debug for CellRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowIndex => f.write_str("RowIndex"),
            Self::Plain => f.write_str("Plain"),
            Self::Date(format) => f.debug_tuple("Date").field(&format.pattern()).finish(),
            Self::BadgeList => f.write_str("BadgeList"),
            Self::Badge => f.write_str("Badge"),
            Self::Formatted(_) => f.write_str("Formatted(..)"),
            Self::Editor(spec) => f.debug_tuple("Editor").field(spec).finish(),
        }
    }
}

/// Coarse render strategy, for hosts that dispatch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    PlainValue,
    FormattedString,
    BadgeList,
    EditableInput,
}

impl RenderStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PlainValue => "plain",
            Self::FormattedString => "formatted",
            Self::BadgeList => "badges",
            Self::EditableInput => "editor",
        }
    }
}

/// One badge token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    /// True for the `+N` summary badge.
    pub overflow: bool,
}

impl Badge {
    fn item(label: String) -> Self {
        Self {
            label,
            overflow: false,
        }
    }
}

/// Rendered cell.
#[derive(Debug, Clone)]
pub enum CellOutput {
    Value(Value),
    Text(String),
    Badges(Vec<Badge>),
    Editor(EditorCell),
}

impl CellOutput {
    /// Flatten to plain text (badges joined by spaces).
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Value(value) => display_value(value),
            Self::Text(text) => text.clone(),
            Self::Badges(badges) => badges
                .iter()
                .map(|b| b.label.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            Self::Editor(cell) => display_value(cell.current_value()),
        }
    }
}

/// Parser output for one column.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    /// Column id: the accessor key, or the header for row-number columns.
    pub id: String,
    pub header: String,
    pub accessor_key: Option<String>,
    pub enable_filter: bool,
    pub enable_sorting: bool,
    pub meta: ColumnMeta,
    pub renderer: CellRenderer,
}

impl ColumnDescriptor {
    #[inline]
    pub fn column_type(&self) -> ColumnType {
        self.meta.column_type
    }

    /// Raw value of this column in a row (`null` for row-number columns).
    pub fn value<'r>(&self, row: &'r Row) -> &'r Value {
        static NULL: Value = Value::Null;
        match &self.accessor_key {
            Some(key) => value_at(row, key),
            None => &NULL,
        }
    }

    pub fn strategy(&self) -> RenderStrategy {
        match self.renderer {
            CellRenderer::RowIndex | CellRenderer::Plain => RenderStrategy::PlainValue,
            CellRenderer::Date(_) | CellRenderer::Formatted(_) => RenderStrategy::FormattedString,
            CellRenderer::BadgeList | CellRenderer::Badge => RenderStrategy::BadgeList,
            CellRenderer::Editor(_) => RenderStrategy::EditableInput,
        }
    }

    /// The editor kind, when the column is editable.
    pub fn editor_kind(&self) -> Option<&EditorKind> {
        match &self.renderer {
            CellRenderer::Editor(spec) => Some(&spec.kind),
            _ => None,
        }
    }

    /// Render one cell. `row_index` is the row's index in the original data.
    pub fn render(&self, row: &Row, row_index: usize) -> CellOutput {
        let value = self.value(row);
        match &self.renderer {
            CellRenderer::RowIndex => CellOutput::Value(Value::from(row_index + 1)),
            CellRenderer::Plain => CellOutput::Value(value.clone()),
            CellRenderer::Date(format) => CellOutput::Text(render_date(value, format)),
            CellRenderer::BadgeList => CellOutput::Badges(badge_list(value)),
            CellRenderer::Badge => CellOutput::Badges(single_badge(value)),
            CellRenderer::Formatted(formatter) => CellOutput::Text(formatter(&CellContext {
                row,
                row_index,
                column_id: &self.id,
                value,
            })),
            CellRenderer::Editor(spec) => CellOutput::Editor(spec.bind(row)),
        }
    }
}

fn badge_list(value: &Value) -> Vec<Badge> {
    let items: Vec<String> = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(display_value).collect(),
        other => vec![display_value(other)],
    };

    let overflow = items.len().saturating_sub(BADGE_LIMIT);
    let mut badges: Vec<Badge> = items.into_iter().take(BADGE_LIMIT).map(Badge::item).collect();
    if overflow > 0 {
        badges.push(Badge {
            label: format!("+{overflow}"),
            overflow: true,
        });
    }
    badges
}

fn single_badge(value: &Value) -> Vec<Badge> {
    if value.is_null() {
        Vec::new()
    } else {
        vec![Badge::item(display_value(value))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_badge_list_truncates() {
        let badges = badge_list(&json!(["a", "b", "c", "d", "e"]));
        let labels: Vec<_> = badges.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c", "+2"]);
        assert!(badges[3].overflow);
        assert!(!badges[0].overflow);
    }

    #[test]
    fn test_badge_list_short_and_exact() {
        assert_eq!(badge_list(&json!(["a", "b"])).len(), 2);
        let exact = badge_list(&json!(["a", "b", "c"]));
        assert_eq!(exact.len(), 3);
        assert!(exact.iter().all(|b| !b.overflow));
        let four = badge_list(&json!(["a", "b", "c", "d"]));
        assert_eq!(four[3].label, "+1");
    }

    #[test]
    fn test_badge_list_non_array() {
        assert!(badge_list(&json!(null)).is_empty());
        assert_eq!(badge_list(&json!("solo"))[0].label, "solo");
    }

    #[test]
    fn test_single_badge() {
        assert_eq!(single_badge(&json!("open"))[0].label, "open");
        assert!(single_badge(&json!(null)).is_empty());
    }
}
