//! Memo resources
//!
//! Any readable memo can be fetched by URI without a tool call:
//! `memo://memos/{uid}` resolves to a Markdown document with a YAML
//! frontmatter header.

use crate::memo::Caller;
use crate::policy::can_read;
use crate::service::{MemoJson, MemoService, ToolError};
use std::fmt::Write as _;
use thiserror::Error;

/// Prefix every memo resource URI starts with
pub const MEMO_URI_PREFIX: &str = "memo://memos/";
/// URI template advertised to clients
pub const MEMO_URI_TEMPLATE: &str = "memo://memos/{uid}";
pub const MEMO_RESOURCE_NAME: &str = "Memo";
pub const MEMO_RESOURCE_DESCRIPTION: &str = "A single Memos note identified by its UID. Returns the memo content as Markdown with a YAML frontmatter header containing metadata.";
pub const MEMO_MIME_TYPE: &str = "text/markdown";

/// Resource resolution failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("invalid memo URI {0:?}: expected memo://memos/<uid>")]
    InvalidUri(String),

    #[error("memo not found: {0}")]
    NotFound(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("{0}")]
    Store(String),
}

/// Extract the uid from a memo URI
pub fn parse_memo_uri(uri: &str) -> Result<&str, ResourceError> {
    match uri.strip_prefix(MEMO_URI_PREFIX) {
        Some(uid) if !uid.is_empty() => Ok(uid),
        _ => Err(ResourceError::InvalidUri(uri.to_string())),
    }
}

/// Render a memo as frontmatter plus body
pub fn render_memo_markdown(memo: &MemoJson) -> String {
    let mut doc = String::from("---\n");
    let _ = writeln!(doc, "name: {}", memo.name);
    let _ = writeln!(doc, "creator: {}", memo.creator);
    let _ = writeln!(doc, "visibility: {}", memo.visibility);
    let _ = writeln!(doc, "state: {}", memo.state);
    let _ = writeln!(doc, "pinned: {}", memo.pinned);
    if !memo.tags.is_empty() {
        let _ = writeln!(doc, "tags: [{}]", memo.tags.join(", "));
    }
    let _ = writeln!(doc, "create_time: {}", memo.create_time);
    let _ = writeln!(doc, "update_time: {}", memo.update_time);
    if let Some(parent) = &memo.parent {
        let _ = writeln!(doc, "parent: {}", parent);
    }
    doc.push_str("---\n\n");
    doc.push_str(&memo.content);
    doc
}

impl MemoService {
    /// Resolve a memo URI to its rendered document
    pub async fn read_memo_resource(
        &self,
        caller: &Caller,
        uri: &str,
    ) -> Result<String, ResourceError> {
        let uid = parse_memo_uri(uri)?;
        let memo = match self.fetch_by_uid(uid).await {
            Ok(memo) => memo,
            Err(ToolError::NotFound) => return Err(ResourceError::NotFound(uid.to_string())),
            Err(err) => return Err(ResourceError::Store(err.to_string())),
        };
        if !can_read(&memo, caller) {
            return Err(ResourceError::PermissionDenied);
        }
        tracing::debug!("Resolved resource {}", uri);
        Ok(render_memo_markdown(&MemoJson::from(&memo)))
    }
}
