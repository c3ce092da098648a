//! Where the config file and the memo database live
//!
//! Paths given on the command line or in config may start with `~`.
//! Defaults sit under the XDG config and data homes.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

const APP_DIR: &str = "memos-mcp";

/// Replace a leading `~` or `~/` with `$HOME`
pub fn expand_home(path: &str) -> Result<PathBuf> {
    if let Some(stripped) = path.strip_prefix('~') {
        let home = std::env::var("HOME").map_err(|_| anyhow!("HOME environment variable not set"))?;
        if stripped.is_empty() {
            Ok(PathBuf::from(home))
        } else if stripped.starts_with('/') {
            Ok(PathBuf::from(format!("{}{}", home, stripped)))
        } else {
            // ~username is left alone
            Ok(PathBuf::from(path))
        }
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Absolute form of a database or config path; relative paths are joined
/// onto the working directory after `~` expansion
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = expand_home(path)?;

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| anyhow!("cannot resolve {:?} without a working directory: {}", path, e))?;
        Ok(cwd.join(expanded))
    }
}

/// `$XDG_CONFIG_HOME/memos-mcp`, falling back to `~/.config/memos-mcp`
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join(APP_DIR)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config").join(APP_DIR)
    } else {
        PathBuf::from(".config").join(APP_DIR)
    }
}

/// Home of the SQLite file: `$XDG_DATA_HOME/memos-mcp` or
/// `~/.local/share/memos-mcp`
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join(APP_DIR)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("share").join(APP_DIR)
    } else {
        PathBuf::from(".local").join("share").join(APP_DIR)
    }
}

/// `config.toml` read by `serve` and written by `init`
pub fn get_default_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Database path written by `init`: memos.db under the data directory
pub fn get_default_database_path() -> PathBuf {
    get_data_dir().join("memos.db")
}
