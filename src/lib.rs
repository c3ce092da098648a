//! memos-mcp: MCP access layer for a Memos note store
//!
//! Exposes memo CRUD, search, comments and tag statistics to AI agents
//! over the Model Context Protocol, enforcing per-memo visibility and
//! ownership on every call.
//!
//! # Modules
//!
//! - `memo`: Data model, resource names and inline tag extraction
//! - `store`: Store contract, CEL filters and the bundled SQLite store
//! - `policy`: Read access and bulk visibility filters
//! - `query`: Tool arguments to store queries, pagination
//! - `service`: The nine memo tool operations
//! - `resource`: `memo://memos/{uid}` documents
//! - `prompts`: capture and review prompt templates
//! - `mcp`: rmcp server handler
//! - `config`: TOML/env configuration and XDG paths

pub mod config;
pub mod mcp;
pub mod memo;
pub mod policy;
pub mod prompts;
pub mod query;
pub mod resource;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use memo::{Caller, Memo, Visibility};
pub use service::{MemoService, ToolError};
pub use store::{MemoStore, SqliteMemoStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
