//! Memo data model
//!
//! Defines memos, their payload, relations between memos and the caller
//! identity used for access decisions.

mod names;
mod tags;

pub use names::{creator_name, memo_name, parse_memo_uid};
pub use tags::{build_payload, extract_tags};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric user identity
pub type UserId = i32;

/// Read-access tier of a memo
///
/// `Unrecognized` carries any stored value outside the three known tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Protected,
    Public,
    Unrecognized(String),
}

impl Visibility {
    /// Parse a caller-supplied visibility; only the three known tiers are accepted
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PRIVATE" => Some(Visibility::Private),
            "PROTECTED" => Some(Visibility::Protected),
            "PUBLIC" => Some(Visibility::Public),
            _ => None,
        }
    }

    /// Map a stored value, keeping unknown values instead of rejecting them
    pub fn from_stored(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| Visibility::Unrecognized(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Visibility::Private => "PRIVATE",
            Visibility::Protected => "PROTECTED",
            Visibility::Public => "PUBLIC",
            Visibility::Unrecognized(s) => s,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a memo row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStatus {
    #[default]
    Normal,
    Archived,
}

impl RowStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NORMAL" => Some(RowStatus::Normal),
            "ARCHIVED" => Some(RowStatus::Archived),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Normal => "NORMAL",
            RowStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content-shape flags computed by the markdown analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoProperty {
    #[serde(default)]
    pub has_link: bool,
    #[serde(default)]
    pub has_task_list: bool,
    #[serde(default)]
    pub has_code: bool,
    #[serde(default)]
    pub has_incomplete_tasks: bool,
}

impl MemoProperty {
    /// True when at least one flag is set
    pub fn any(&self) -> bool {
        self.has_link || self.has_task_list || self.has_code || self.has_incomplete_tasks
    }
}

/// Derived memo data
///
/// Tags are written inline by this crate; `property` belongs to the
/// markdown analyzer and is only carried through.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoPayload {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<MemoProperty>,
}

/// A note or a comment (a comment has a parent)
#[derive(Debug, Clone, PartialEq)]
pub struct Memo {
    /// Internal row id, never exposed
    pub id: i32,
    pub uid: String,
    pub creator_id: UserId,
    pub created_ts: i64,
    pub updated_ts: i64,
    pub row_status: RowStatus,
    pub content: String,
    pub visibility: Visibility,
    pub pinned: bool,
    pub payload: Option<MemoPayload>,
    pub parent_uid: Option<String>,
}

impl Memo {
    /// Tags from the payload, empty when there is none
    pub fn tags(&self) -> &[String] {
        self.payload.as_ref().map(|p| p.tags.as_slice()).unwrap_or(&[])
    }

    pub fn is_comment(&self) -> bool {
        self.parent_uid.is_some()
    }
}

/// Relation types between memos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoRelationType {
    Comment,
}

impl MemoRelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoRelationType::Comment => "COMMENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "COMMENT" => Some(MemoRelationType::Comment),
            _ => None,
        }
    }
}

/// Directed edge `memo_id -> related_memo_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoRelation {
    pub memo_id: i32,
    pub related_memo_id: i32,
    pub relation_type: MemoRelationType,
}

impl MemoRelation {
    /// Comment edge from `comment_id` to `parent_id`
    pub fn comment(comment_id: i32, parent_id: i32) -> Self {
        Self {
            memo_id: comment_id,
            related_memo_id: parent_id,
            relation_type: MemoRelationType::Comment,
        }
    }
}

/// Identity of whoever issued a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Caller {
    #[default]
    Anonymous,
    User(UserId),
}

impl Caller {
    pub fn from_user_id(user_id: Option<UserId>) -> Self {
        match user_id {
            Some(id) => Caller::User(id),
            None => Caller::Anonymous,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Caller::User(id) => Some(*id),
            Caller::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::User(_))
    }
}
