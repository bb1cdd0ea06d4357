use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Explicit todo file; takes precedence over the pattern when set.
    #[serde(default)]
    pub file_path: Option<String>,
    /// File name pattern; `{YYYY-MM-DD}` expands to today's date.
    #[serde(default)]
    pub file_pattern: Option<String>,
    /// Directory the pattern resolves against.
    #[serde(default)]
    pub base_directory: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
        Config {
            file_path: None,
            file_pattern: Some("todos-{YYYY-MM-DD}.md".to_string()),
            base_directory: Some(
                home.join("Documents").join("todos").to_string_lossy().into_owned(),
            ),
        }
    }
}
