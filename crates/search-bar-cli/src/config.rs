use search_bar::SearchBarConfig;
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

/// Application configuration loaded from search-bar.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub search: SearchBarConfig,
    /// Delay between simulated keystrokes when typing the query
    #[serde(default = "default_keystroke_ms")]
    pub keystroke_ms: u64,
    /// Markers wrapped around highlighted text in plain output
    #[serde(default = "default_highlight_open")]
    pub highlight_open: String,
    #[serde(default = "default_highlight_close")]
    pub highlight_close: String,
}

fn default_keystroke_ms() -> u64 {
    40
}

fn default_highlight_open() -> String {
    "[".to_string()
}

fn default_highlight_close() -> String {
    "]".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchBarConfig::default(),
            keystroke_ms: default_keystroke_ms(),
            highlight_open: default_highlight_open(),
            highlight_close: default_highlight_close(),
        }
    }
}

impl Config {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        const CONFIG_FILE: &str = "search-bar.toml";

        if let Some(config) = Self::read(PathBuf::from(CONFIG_FILE)) {
            return config;
        }

        if let Some(home) = env::var_os("HOME")
            && let Some(config) = Self::read(PathBuf::from(home).join(format!(".{}", CONFIG_FILE)))
        {
            return config;
        }

        log::debug!("Using default config");
        Self::default()
    }

    fn read(path: PathBuf) -> Option<Self> {
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(err) => {
                log::warn!("Ignoring invalid config {}: {}", path.display(), err);
                None
            }
        }
    }
}
