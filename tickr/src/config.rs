//! Engine configuration
//!
//! Defaults match the shipped app. Hosts can deserialize overrides from JSON
//! or pass a record over FFI.

use serde::Deserialize;

/// Maximum number of recent queries kept.
pub const DEFAULT_HISTORY_CAPACITY: u32 = 10;

/// Key the history list is stored under.
pub const DEFAULT_HISTORY_KEY: &str = "search_history";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct SearchConfig {
    pub history_capacity: u32,
    pub history_key: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_key: DEFAULT_HISTORY_KEY.to_string(),
        }
    }
}

impl SearchConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Capacity as a length, never below 1.
    pub fn capacity(&self) -> usize {
        self.history_capacity.max(1) as usize
    }
}
