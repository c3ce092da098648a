//! Configuration module for memos-mcp
//!
//! Holds the TOML/env configuration and XDG path helpers.

pub mod app_config;
pub mod path_resolver;

pub use app_config::AppConfig;
