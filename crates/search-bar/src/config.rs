use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Search bar settings shared by every session created from it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchBarConfig {
    /// Quiet period after the last keystroke before the query is searched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Dialog title announced to assistive tech
    #[serde(default = "default_title")]
    pub title: String,
    /// Dialog description announced to assistive tech
    #[serde(default = "default_description")]
    pub description: String,
    /// Text shown on the trigger before the dialog is opened
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_title() -> String {
    "Command Palette".to_string()
}

fn default_description() -> String {
    "Search for a command to run...".to_string()
}

fn default_placeholder() -> String {
    "Search...".to_string()
}

impl Default for SearchBarConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            title: default_title(),
            description: default_description(),
            placeholder: default_placeholder(),
        }
    }
}

impl SearchBarConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchBarConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.title, "Command Palette");
        assert_eq!(config.placeholder, "Search...");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SearchBarConfig =
            serde_json::from_str(r#"{ "debounce_ms": 50 }"#).unwrap();
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.description, "Search for a command to run...");
    }
}
