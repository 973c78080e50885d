//! Script files: a sequence of lines to reveal one after another.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub text: String,
    /// Overrides the configured pause after this line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub lines: Vec<ScriptLine>,
    /// Overrides the configured typewriter speed for untagged lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chars_per_second: Option<f64>,
}

impl Script {
    /// A script holding a single line.
    pub fn single(text: &str) -> Self {
        Script {
            lines: vec![ScriptLine {
                text: text.to_string(),
                hold_ms: None,
            }],
            chars_per_second: None,
        }
    }
}
