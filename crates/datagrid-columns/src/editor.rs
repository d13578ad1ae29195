//! Editable-cell capability.
//!
//! An editable column renders as an [`EditorCell`]: the cell's current value
//! plus the knowledge needed to hand an edited row back to the host. Commit
//! is the only path by which the grid signals a data mutation.

use std::fmt;
use std::sync::Arc;

use datagrid_model::{ColumnType, Row};
use serde_json::Value;

/// Host callback invoked with the full, merged row after an edit.
pub type EditCallback = Arc<dyn Fn(Row) + Send + Sync>;

/// Which editor a column uses.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorKind {
    /// Free-text input (text and boolean columns).
    Text {
        column_type: ColumnType,
        max_length: Option<usize>,
        placeholder: Option<String>,
    },
    /// Numeric input with optional inclusive bounds.
    Number { min: Option<f64>, max: Option<f64> },
    /// Date picker.
    Date {
        min_date: Option<String>,
        max_date: Option<String>,
    },
    /// Choice among candidate items. `multiple` for array columns.
    Choice {
        items: Option<Vec<String>>,
        allow_additions: bool,
        multiple: bool,
    },
}

/// Editor binding resolved at parse time.
#[derive(Clone)]
pub struct EditorSpec {
    pub kind: EditorKind,
    pub accessor_key: String,
    pub(crate) on_edit: EditCallback,
}

impl fmt::Debug for EditorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSpec")
            .field("kind", &self.kind)
            .field("accessor_key", &self.accessor_key)
            .finish_non_exhaustive()
    }
}

impl EditorSpec {
    pub(crate) fn new(kind: EditorKind, accessor_key: String, on_edit: &EditCallback) -> Self {
        Self {
            kind,
            accessor_key,
            on_edit: Arc::clone(on_edit),
        }
    }

    /// Bind the editor to one row.
    pub fn bind(&self, row: &Row) -> EditorCell {
        EditorCell {
            kind: self.kind.clone(),
            value: row.get(&self.accessor_key).cloned().unwrap_or(Value::Null),
            row: row.clone(),
            accessor_key: self.accessor_key.clone(),
            on_edit: Arc::clone(&self.on_edit),
        }
    }
}

/// Shared capability of every cell editor.
pub trait CellEditor {
    /// The value the editor currently holds.
    fn current_value(&self) -> &Value;

    /// Commit a new value: the host receives a shallow copy of the row with
    /// the value merged in at the column's accessor key.
    fn commit(&self, new_value: Value);
}

/// An editor bound to one cell.
#[derive(Clone)]
pub struct EditorCell {
    kind: EditorKind,
    value: Value,
    row: Row,
    accessor_key: String,
    on_edit: EditCallback,
}

impl fmt::Debug for EditorCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorCell")
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("accessor_key", &self.accessor_key)
            .finish_non_exhaustive()
    }
}

impl EditorCell {
    pub fn kind(&self) -> &EditorKind {
        &self.kind
    }

    pub fn accessor_key(&self) -> &str {
        &self.accessor_key
    }

    /// Replace the working value without committing.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Append a new item to a multiple-choice editor's working value.
    ///
    /// Returns `false` when the editor does not accept additions.
    pub fn add_item(&mut self, item: impl Into<String>) -> bool {
        let EditorKind::Choice {
            allow_additions: true,
            multiple: true,
            ..
        } = self.kind
        else {
            return false;
        };

        let item = Value::String(item.into());
        match &mut self.value {
            Value::Array(items) => items.push(item),
            other => *other = Value::Array(vec![item]),
        }
        true
    }

    /// Commit the working value.
    pub fn commit_current(&self) {
        self.commit(self.value.clone());
    }
}

impl CellEditor for EditorCell {
    fn current_value(&self) -> &Value {
        &self.value
    }

    fn commit(&self, new_value: Value) {
        let mut edited = self.row.clone();
        edited.insert(self.accessor_key.clone(), new_value);
        tracing::debug!(column = %self.accessor_key, "cell edit committed");
        (self.on_edit)(edited);
    }
}
