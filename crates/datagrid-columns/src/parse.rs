//! The column parser.
//!
//! Dispatch is resolved once per column: the render strategy is chosen here
//! and stored in the descriptor, so rendering a cell never re-inspects the
//! definition.

use datagrid_model::ColumnType;

use crate::date::{DEFAULT_DATE_FORMAT, DateFormat};
use crate::def::{ColumnCommon, ColumnDef};
use crate::descriptor::{CellRenderer, ColumnDescriptor, ColumnMeta};
use crate::editor::{EditCallback, EditorKind, EditorSpec};

/// Header (and id) of a row-number column without an explicit header.
pub const DEFAULT_ROW_NUMBER_HEADER: &str = "row_number";

/// Parse every column of a schema, in order.
pub fn parse_columns(columns: &[ColumnDef], on_edit: &EditCallback) -> Vec<ColumnDescriptor> {
    let descriptors: Vec<_> = columns
        .iter()
        .map(|column| parse_column(column, on_edit))
        .collect();
    tracing::debug!(columns = descriptors.len(), "parsed column schema");
    descriptors
}

/// Parse one column definition into its dispatch descriptor.
pub fn parse_column(column: &ColumnDef, on_edit: &EditCallback) -> ColumnDescriptor {
    let common = column.common();

    let Some(field) = column.field() else {
        let header = common
            .header
            .clone()
            .unwrap_or_else(|| DEFAULT_ROW_NUMBER_HEADER.to_string());
        return ColumnDescriptor {
            id: header.clone(),
            header,
            accessor_key: None,
            enable_filter: false,
            enable_sorting: false,
            meta: meta(common, ColumnType::RowNumber, None),
            renderer: CellRenderer::RowIndex,
        };
    };

    let key = field.resolve();
    let items = column_items(column);
    let renderer = match editor_kind(column) {
        Some(kind) => CellRenderer::Editor(EditorSpec::new(kind, key.clone(), on_edit)),
        None => display_renderer(column),
    };

    ColumnDescriptor {
        id: key.clone(),
        header: common.header.clone().unwrap_or_else(|| key.clone()),
        accessor_key: Some(key),
        enable_filter: common.filterable.unwrap_or(true),
        enable_sorting: common.sortable.unwrap_or(true),
        meta: meta(common, column.column_type(), items),
        renderer,
    }
}

fn meta(common: &ColumnCommon, column_type: ColumnType, items: Option<Vec<String>>) -> ColumnMeta {
    ColumnMeta {
        icon: common.header_icon.clone(),
        column_type,
        detail: common.detail,
        items,
    }
}

fn column_items(column: &ColumnDef) -> Option<Vec<String>> {
    match column {
        ColumnDef::List(c) => c.items.clone(),
        ColumnDef::Array(c) => c.items.clone(),
        _ => None,
    }
}

/// Renderer for a column that is not editable. A formatter replaces the
/// type's own renderer.
fn display_renderer(column: &ColumnDef) -> CellRenderer {
    if let Some(formatter) = &column.common().formatter {
        return CellRenderer::Formatted(formatter.clone());
    }
    match column {
        ColumnDef::Date(c) => CellRenderer::Date(DateFormat::compile(
            c.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT),
        )),
        ColumnDef::Array(_) => CellRenderer::BadgeList,
        ColumnDef::List(_) => CellRenderer::Badge,
        _ => CellRenderer::Plain,
    }
}

/// Editor for an editable column, `None` otherwise.
fn editor_kind(column: &ColumnDef) -> Option<EditorKind> {
    match column {
        ColumnDef::RowNumber(_) => None,
        ColumnDef::Text(c) => c.editable.then(|| EditorKind::Text {
            column_type: ColumnType::Text,
            max_length: c.max_length,
            placeholder: c.placeholder.clone(),
        }),
        ColumnDef::Number(c) => c.editable.options().map(|opts| EditorKind::Number {
            min: opts.min,
            max: opts.max,
        }),
        ColumnDef::Boolean(c) => c.editable.then_some(EditorKind::Text {
            column_type: ColumnType::Boolean,
            max_length: None,
            placeholder: None,
        }),
        ColumnDef::Date(c) => c.editable.options().map(|opts| EditorKind::Date {
            min_date: opts.min_date,
            max_date: opts.max_date,
        }),
        ColumnDef::List(c) => c.editable.options().map(|opts| EditorKind::Choice {
            items: opts.items.or_else(|| c.items.clone()),
            allow_additions: false,
            multiple: false,
        }),
        ColumnDef::Array(c) => c.editable.options().map(|opts| EditorKind::Choice {
            items: opts.items.or_else(|| c.items.clone()),
            allow_additions: opts.allow_additions,
            multiple: true,
        }),
    }
}
