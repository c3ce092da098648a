//! Per-call tool errors
//!
//! Every variant is reported back to the calling agent as a failed tool
//! result; none of them ends the protocol session.

use crate::store::StoreError;
use thiserror::Error;

/// Tool call failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    /// Malformed argument or invalid enum value
    #[error("{0}")]
    Validation(String),

    #[error("memo not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("unauthenticated: a personal access token is required")]
    Unauthenticated,

    /// Persistence failure, prefixed with the failing step
    #[error("{step}: {message}")]
    Store { step: &'static str, message: String },
}

impl ToolError {
    /// Wrap a store error; invalid filters are the caller's fault
    pub fn store(step: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::InvalidFilter { .. } => ToolError::Validation(err.to_string()),
            other => ToolError::Store {
                step,
                message: other.to_string(),
            },
        }
    }
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;
