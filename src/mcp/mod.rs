//! MCP server module
//!
//! Wires [`MemoService`](crate::service::MemoService) into an rmcp
//! `ServerHandler` served over stdio.

mod server;

pub use server::MemosMcpServer;
