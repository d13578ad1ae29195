//! Column schema errors.
//!
//! Column definitions built in code are always well formed; these errors only
//! arise when a schema is loaded from data.

use datagrid_model::ColumnType;
use thiserror::Error;

/// Column schema loading error.
#[derive(Debug, Error)]
pub enum ColumnError {
    /// A non-`rowNumber` column has no `field`.
    #[error("Column {position} ({column_type}) has no field accessor")]
    MissingField {
        position: String,
        column_type: ColumnType,
    },

    /// The `editable` options object does not match the column type.
    #[error("Column {position} has invalid editable options")]
    InvalidEditable {
        position: String,
        #[source]
        source: serde_json::Error,
    },

    /// The schema document itself could not be parsed.
    #[error("Failed to parse column schema")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

impl ColumnError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField {
                position,
                column_type,
            } => format!(
                "The {} column {} needs a \"field\" naming the row key it displays.",
                column_type, position
            ),
            Self::InvalidEditable { position, source } => {
                format!("The editable options of column {position} are invalid: {source}")
            }
            Self::Json { source } => format!("The column schema is not valid JSON: {source}"),
        }
    }
}
