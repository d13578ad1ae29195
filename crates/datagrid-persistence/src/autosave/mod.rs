//! Auto-save building blocks.
//!
//! Provides:
//! - `AutoSaveConfig` - Debounce and settle delays
//! - `DirtyTracker` - Tracks unsaved changes and running saves
//! - `DebounceTimer` - Cancellable trailing-edge timer

mod config;
mod timer;
mod tracker;

pub use config::AutoSaveConfig;
pub use timer::{DebounceTimer, TimerHandle};
pub use tracker::DirtyTracker;
