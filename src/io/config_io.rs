use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::model::config::Config;

/// Error type for configuration handling
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a config directory (HOME is unset)")]
    NoConfigDir,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("config has neither file_path nor file_pattern")]
    NoTodoPath,
}

/// Config file location: `$XDG_CONFIG_HOME/td/config.toml`, falling back to
/// `~/.config/td/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("td").join("config.toml"));
        }
    }
    let home = std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(PathBuf::from(home).join(".config").join("td").join("config.toml"))
}

/// Load the config at `path`, writing a default one on first run.
pub fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        let config = Config::default();
        save(path, &config)?;
        return Ok(config);
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Write the config, creating parent directories as needed.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| ConfigError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    let text = toml::to_string_pretty(config)?;
    fs::write(path, text).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Resolve the todo file path from the config: an explicit `file_path` wins,
/// else `base_directory` joined with `file_pattern`, where `{YYYY-MM-DD}`
/// expands to today's local date.
pub fn resolve_todo_path(config: &Config) -> Result<PathBuf, ConfigError> {
    if let Some(file_path) = config.file_path.as_deref().filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(file_path));
    }
    if let Some(pattern) = config.file_pattern.as_deref().filter(|p| !p.is_empty()) {
        let filename =
            pattern.replace("{YYYY-MM-DD}", &Local::now().format("%Y-%m-%d").to_string());
        return Ok(
            match config.base_directory.as_deref().filter(|d| !d.is_empty()) {
                Some(dir) => PathBuf::from(dir).join(filename),
                None => PathBuf::from(filename),
            },
        );
    }
    Err(ConfigError::NoTodoPath)
}
