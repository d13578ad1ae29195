//! Persistence of grid view state.
//!
//! A [`PersistenceManager`] attaches to one grid's store. It loads the
//! stored record on start, applies the fields its policy includes, and from
//! then on writes the state back after every burst of changes.
//!
//! # Features
//!
//! - **Opt-out**: persistence is on unless disabled, given a grid id or key
//! - **Granular**: per-field inclusion, enforced on save and on load
//! - **Trailing-edge debounce**: only the last state of a burst is written
//! - **Serialized I/O**: save, load and reset never overlap per grid
//!
//! # Architecture
//!
//! - `manager.rs` - Phases, load, autosave, reset
//! - `convert.rs` - Policy-gated capture and apply
//! - `autosave/` - Config, dirty tracking, debounce timer

mod autosave;
mod convert;
mod manager;

pub use autosave::{AutoSaveConfig, DebounceTimer, DirtyTracker, TimerHandle};
pub use convert::{apply, capture};
pub use manager::{LoadOutcome, Phase, PersistStatus, PersistenceManager};
