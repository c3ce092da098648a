//! Memo store
//!
//! The persistence contract consumed by the access layer, plus a bundled
//! SQLite implementation with CEL filter expressions.

mod filter;
mod sqlite;

pub use filter::{cel_string_literal, MemoFilter};
pub use sqlite::SqliteMemoStore;

use crate::memo::{
    Memo, MemoPayload, MemoProperty, MemoRelation, MemoRelationType, RowStatus, UserId,
    Visibility,
};
use async_trait::async_trait;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite failure
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Payload (de)serialization failure
    #[error("payload encoding error: {0}")]
    Payload(#[from] serde_json::Error),

    /// Filter expression failed to compile or did not yield a boolean
    #[error("invalid filter {expression:?}: {message}")]
    InvalidFilter { expression: String, message: String },

    /// A stored row holds a value outside the model
    #[error("corrupt row {id}: {message}")]
    CorruptRow { id: i32, message: String },

    /// Write addressed a row that does not exist
    #[error("memo {0} does not exist")]
    MissingMemo(i32),
}

/// Query over memos
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindMemo {
    /// Filter expressions, all must hold
    pub filters: Vec<String>,
    /// Restrict to these visibilities when non-empty
    pub visibility_list: Vec<Visibility>,
    pub row_status: Option<RowStatus>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub order_by_pinned: bool,
    /// Restrict to these internal ids when set
    pub id_list: Option<Vec<i32>>,
    /// Return rows with empty content
    pub exclude_content: bool,
    /// Skip memos that are comments of another memo
    pub exclude_comments: bool,
}

/// Single-row lookup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoLookup {
    Uid(String),
    Id(i32),
}

/// New memo to persist
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMemo {
    pub uid: String,
    pub creator_id: UserId,
    pub content: String,
    pub visibility: Visibility,
    pub payload: Option<MemoPayload>,
    pub parent_uid: Option<String>,
}

/// Partial update; `Some` marks a supplied field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMemo {
    pub id: i32,
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
    pub row_status: Option<RowStatus>,
    pub pinned: Option<bool>,
    /// Replaces the payload tag set, leaving the property flags alone
    pub tags: Option<Vec<String>>,
    /// Replaces the property flags, leaving the tags alone
    pub property: Option<MemoProperty>,
}

impl UpdateMemo {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// True when no field is supplied
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.visibility.is_none()
            && self.row_status.is_none()
            && self.pinned.is_none()
            && self.tags.is_none()
            && self.property.is_none()
    }
}

/// Query over memo relations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindMemoRelation {
    pub memo_id: Option<i32>,
    pub related_memo_id: Option<i32>,
    pub relation_type: Option<MemoRelationType>,
}

/// Persistence operations the access layer relies on
#[async_trait]
pub trait MemoStore: Send + Sync {
    async fn create_memo(&self, create: CreateMemo) -> Result<Memo, StoreError>;

    async fn list_memos(&self, find: &FindMemo) -> Result<Vec<Memo>, StoreError>;

    async fn get_memo(&self, lookup: &MemoLookup) -> Result<Option<Memo>, StoreError>;

    async fn update_memo(&self, update: &UpdateMemo) -> Result<(), StoreError>;

    /// Hard delete
    async fn delete_memo(&self, id: i32) -> Result<(), StoreError>;

    async fn list_memo_relations(
        &self,
        find: &FindMemoRelation,
    ) -> Result<Vec<MemoRelation>, StoreError>;

    async fn upsert_memo_relation(
        &self,
        relation: MemoRelation,
    ) -> Result<MemoRelation, StoreError>;
}
