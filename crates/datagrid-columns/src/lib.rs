//! Column definitions and the column parser.
//!
//! A grid is described by a list of [`ColumnDef`]s. Each definition is a
//! tagged variant (row number, text, date, number, boolean, array, list) with
//! a field accessor, sort/filter flags, an optional formatter and optional
//! editability.
//!
//! [`parse_column`] turns one definition plus the host's edit callback into a
//! [`ColumnDescriptor`]: header label, accessor key, metadata, and the
//! [`CellRenderer`] that decides how a cell is rendered or edited. Parsing is
//! pure and total; it never fails and holds no mutable state.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use datagrid_columns::{CellOutput, ColumnDef, EditCallback, parse_column};
//! use serde_json::json;
//!
//! let on_edit: EditCallback = Arc::new(|_row| {});
//! let tags = ColumnDef::array("tags", None);
//! let descriptor = parse_column(&tags, &on_edit);
//!
//! let row = json!({ "tags": ["a", "b", "c", "d", "e"] });
//! let output = descriptor.render(row.as_object().unwrap(), 0);
//! assert_eq!(output.to_display_string(), "a b c +2");
//! ```
//!
//! # Architecture
//!
//! - `def.rs` - Column definition variants and builders
//! - `schema.rs` - Loading definitions from JSON
//! - `parse.rs` - The parser
//! - `descriptor.rs` - Dispatch descriptors and cell output
//! - `editor.rs` - Editable-cell capability
//! - `date.rs` - Date parsing and format tokens
//! - `value.rs` - Value display helpers

mod date;
mod def;
mod descriptor;
mod editor;
mod error;
mod parse;
mod schema;
mod value;

pub use date::{DEFAULT_DATE_FORMAT, DateFormat, INVALID_DATE, parse_date_value, render_date};
pub use def::{
    ArrayColumn, ArrayEditOptions, BooleanColumn, CellContext, ColumnCommon, ColumnDef,
    DateColumn, DateEditOptions, Editable, FieldAccessor, Formatter, ListColumn,
    ListEditOptions, NumberColumn, NumberEditOptions, RowNumberColumn, TextColumn,
};
pub use descriptor::{
    BADGE_LIMIT, Badge, CellOutput, CellRenderer, ColumnDescriptor, ColumnMeta, RenderStrategy,
};
pub use editor::{CellEditor, EditCallback, EditorCell, EditorKind, EditorSpec};
pub use error::ColumnError;
pub use parse::{DEFAULT_ROW_NUMBER_HEADER, parse_column, parse_columns};
pub use schema::{columns_from_json, columns_from_value};
pub use value::{display_value, value_at};
