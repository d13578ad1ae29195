//! Auto-save configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing of autosave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoSaveConfig {
    /// Quiet period in milliseconds.
    ///
    /// After a change, the manager waits this long before saving.
    /// Additional changes restart the wait.
    pub debounce_ms: u64,

    /// Delay in milliseconds between applying loaded state and starting to
    /// observe changes.
    pub settle_ms: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            settle_ms: 100,
        }
    }
}

impl AutoSaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
