use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::TextStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Typewriter speed for lines without reveal tags.
    pub chars_per_second: f64,
    /// Base style for untagged text.
    pub style: TextStyle,
    /// Pause after a script line finishes, before the next one starts.
    pub hold_ms: u64,
    /// Safety cap on frames produced by `dump`.
    pub max_frames: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            chars_per_second: 30.0,
            style: TextStyle::default(),
            hold_ms: 1200,
            max_frames: 10_000,
        }
    }
}

impl PlayerConfig {
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => Self::from_json(&json),
            Err(_) => Self::default(),
        }
    }

    /// Parse a config document, falling back to defaults if it is invalid.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("invalid player config ({e}), using defaults");
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("crazy-text");
        path.push("player.json");
        path
    }
}
