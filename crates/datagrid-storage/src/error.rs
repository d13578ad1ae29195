//! Storage error types.
//!
//! Storage errors never reach the persistence manager: [`crate::StateStorage`]
//! logs them and falls back or reports "no data". They are public for hosts
//! that drive a backend directly.

use std::path::PathBuf;
use thiserror::Error;

/// Storage operation error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The document store could not be opened or initialized.
    #[error("Failed to initialize document store at {path}")]
    Init {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed.
    #[error("Document store {operation} failed")]
    Database {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Key longer than the document store accepts.
    #[error("Storage key is {len} characters (maximum: {max})")]
    KeyTooLong { len: usize, max: usize },

    /// File I/O error in the flat key/value store.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Failed to serialize grid state")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Stored state could not be parsed.
    #[error("Stored state for '{key}' is malformed")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The blocking task running a storage operation failed.
    #[error("Storage task failed")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },

    /// The backend is not available in this process.
    #[error("Document store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StorageError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Init { path, .. } => {
                format!("Could not open the grid state database at {}", path.display())
            }
            Self::Database { operation, .. } => {
                format!("The grid state database could not complete a {operation}.")
            }
            Self::KeyTooLong { len, max } => {
                format!("The grid id is {len} characters long; the database accepts at most {max}.")
            }
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::Serialization { .. } => {
                "An error occurred while saving the grid state.".to_string()
            }
            Self::Deserialization { key, .. } => {
                format!("The saved state for grid '{key}' could not be read. It may be corrupted.")
            }
            Self::Task { .. } => "A background storage task stopped unexpectedly.".to_string(),
            Self::Unavailable { reason } => format!("The grid state database is unavailable: {reason}"),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Init { .. } => {
                Some("Check that the data directory exists and is writable.".into())
            }
            Self::Database { .. } => {
                Some("Close other programs using the database and try again.".into())
            }
            Self::KeyTooLong { .. } => Some("Use a shorter grid id or persistence key.".into()),
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that you have permission to read the data directory.".into())
                } else {
                    Some("Check that you have permission to write to the data directory.".into())
                }
            }
            Self::Serialization { .. } | Self::Task { .. } => None,
            Self::Deserialization { .. } => Some("Reset the grid state to start over.".into()),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
