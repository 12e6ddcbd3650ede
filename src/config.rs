//! Session tuning. Economy constants live in `economy::catalog`.

use serde::Deserialize;

/// localStorage key, shared with saves from the earlier browser version.
pub const DEFAULT_SAVE_KEY: &str = "banana-tycoon-save-v3";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Simulation quantum in milliseconds (100ms = 10 ticks/sec).
    pub tick_interval_ms: u32,
    /// Autosave period in milliseconds.
    pub autosave_interval_ms: u32,
    /// Longest frame gap honoured in one update. Longer gaps (a backgrounded
    /// tab) are clamped.
    pub max_frame_delta_ms: f64,
    pub save_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            autosave_interval_ms: 5_000,
            max_frame_delta_ms: 500.0,
            save_key: DEFAULT_SAVE_KEY.to_string(),
        }
    }
}

impl SessionConfig {
    /// Parse a (possibly partial) JSON override; missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
