//! Command-line host for the data grid engine.
//!
//! The binary reads a column schema, rows and an options file, replays
//! command-line flags as user interactions and prints the current page.
//! View state is saved through the persistence manager and restored on the
//! next run with the same grid id.

pub mod host;
pub mod input;
pub mod interact;
pub mod logging;
pub mod render;
