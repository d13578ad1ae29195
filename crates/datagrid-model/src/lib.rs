//! Data model types for the data grid engine.
//!
//! This crate holds the plain data shared by every layer of the grid:
//!
//! - [`ColumnType`]: the type tag of a column definition
//! - [`GridState`]: the live view state (view mode, pagination, search,
//!   sorting, filters, sizing, order, visibility)
//! - [`PersistedState`]: the serializable snapshot written to storage
//! - [`GridOptions`] / [`PersistPolicy`]: host-supplied configuration
//!
//! Nothing here performs I/O or holds behavior beyond small invariant-keeping
//! helpers; parsing, derivation and persistence live in sibling crates.

mod column_type;
mod options;
mod record;
mod state;

pub use column_type::ColumnType;
pub use options::{GridOptions, PersistPolicy, StateInclusion, StorageBackend};
pub use record::{PaginationState, PersistedState};
pub use state::{
    ColumnFilter, DEFAULT_PAGE_SIZE, GridState, SortDirection, SortEntry, ViewMode,
    dedupe_filters, dedupe_sorting,
};

/// A single data row: field name to JSON value.
///
/// Rows are supplied by the host and never mutated in place; edits produce a
/// merged copy that is handed back through the edit callback.
pub type Row = serde_json::Map<String, serde_json::Value>;
