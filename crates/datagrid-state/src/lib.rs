//! Observable grid view state.
//!
//! [`GridStore`] holds the live state of one grid (view mode, pagination,
//! search, sorting, column filters, sizing, order and visibility) together
//! with its rows and parsed columns, and derives the row model on access.
//!
//! Every mutation that changes a value notifies registered observers with a
//! [`StateChange`]. [`GridStore::apply_silently`] changes state without
//! notifying, for loading persisted state.
//!
//! # Architecture
//!
//! - `store.rs` - The store and its mutators
//! - `handle.rs` - Shared, thread-safe handle
//! - `observer.rs` - Observer registry
//! - `row_model.rs` - Search, filter, sort and pagination pipeline
//! - `filter.rs` - Column filter functions
//! - `sort.rs` - Cell ordering
//! - `sizing.rs` - Column widths and the pixel-size map

mod filter;
mod handle;
mod observer;
mod row_model;
mod sizing;
mod sort;
mod store;

pub use filter::FilterFn;
pub use handle::GridHandle;
pub use observer::{StateChange, StateField, SubscriptionId};
pub use row_model::{RowModel, page_count};
pub use sizing::{
    ColumnSizeMap, DEFAULT_COLUMN_SIZE, MAX_COLUMN_SIZE, MIN_COLUMN_SIZE, clamp_size, column_size,
};
pub use sort::compare_cells;
pub use store::{DetailCallback, GridStore, merge_filters};
