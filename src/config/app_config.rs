//! Application configuration module for memos-mcp
//!
//! Provides TOML-based configuration with environment variable override support.
//! Priority: CLI args > Environment variables > Config file > Defaults

use crate::memo::{Caller, UserId};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file (default: memos.db)
    #[serde(default = "default_database_path")]
    database_path: String,

    /// Identity the server acts as; absent means anonymous
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
}

fn default_database_path() -> String {
    "memos.db".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            user_id: None,
        }
    }
}

impl AppConfig {
    /// Create config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("MEMOS_MCP_DATABASE") {
            config.database_path = path;
        }

        if let Ok(user_id) = std::env::var("MEMOS_MCP_USER_ID") {
            if let Ok(id) = user_id.parse() {
                config.user_id = Some(id);
            }
        }

        config
    }

    /// File config (when present) overridden by the environment
    pub fn load(config_path: &Path) -> Result<Self> {
        let base = if config_path.exists() {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };
        Ok(base.merge_with(&Self::from_env()))
    }

    /// Merge with another config (other takes priority for non-default values)
    pub fn merge_with(&self, other: &Self) -> Self {
        Self {
            database_path: if other.database_path != default_database_path() {
                other.database_path.clone()
            } else {
                self.database_path.clone()
            },
            user_id: other.user_id.or(self.user_id),
        }
    }

    /// Override database_path
    pub fn with_database_path(mut self, path: &str) -> Self {
        self.database_path = path.to_string();
        self
    }

    /// Override user_id
    pub fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database_path.trim().is_empty() {
            return Err(anyhow!("database_path must not be empty"));
        }

        if let Some(id) = self.user_id {
            if id <= 0 {
                return Err(anyhow!("user_id must be positive, got {}", id));
            }
        }

        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialize config: {}", e))
    }

    // Getters
    pub fn database_path(&self) -> &str {
        &self.database_path
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Caller identity for every request the server handles
    pub fn caller(&self) -> Caller {
        Caller::from_user_id(self.user_id)
    }
}
