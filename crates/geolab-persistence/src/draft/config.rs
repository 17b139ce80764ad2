//! Draft writer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for debounced draft writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Whether drafts are written at all.
    pub enabled: bool,

    /// Debounce delay in milliseconds.
    ///
    /// After an edit, the writer waits this long before persisting.
    /// Further edits reset the timer.
    pub debounce_ms: u64,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 700,
        }
    }
}

impl DraftConfig {
    /// A config that never writes drafts.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
