//! Visibility policy
//!
//! Decides per-memo read access and the row-level restriction applied to
//! bulk queries. Both must agree: a memo returned by a policy-filtered
//! query is always readable by the same caller.

use crate::memo::{Caller, Memo, UserId, Visibility};
use crate::service::{ToolError, ToolResult};
use crate::store::FindMemo;

/// Whether `caller` may read `memo`
///
/// Unrecognized visibility values are readable.
pub fn can_read(memo: &Memo, caller: &Caller) -> bool {
    match &memo.visibility {
        Visibility::Public => true,
        Visibility::Protected => caller.is_authenticated(),
        Visibility::Private => caller.user_id() == Some(memo.creator_id),
        Visibility::Unrecognized(_) => true,
    }
}

/// Whether `user_id` owns `memo`
pub fn is_owner(memo: &Memo, user_id: UserId) -> bool {
    memo.creator_id == user_id
}

/// Writes are reserved to the creator; there is no override
pub fn ensure_owner(memo: &Memo, user_id: UserId) -> ToolResult<()> {
    if is_owner(memo, user_id) {
        Ok(())
    } else {
        Err(ToolError::PermissionDenied)
    }
}

/// Row-level restriction for bulk queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityFilter {
    /// Anonymous callers see public memos only
    PublicOnly,
    /// Authenticated callers see their own memos plus public and protected ones
    OwnedOrShared(UserId),
}

impl VisibilityFilter {
    /// Filter expression for `OwnedOrShared`, `None` for `PublicOnly`
    pub fn expression(&self) -> Option<String> {
        match self {
            VisibilityFilter::PublicOnly => None,
            VisibilityFilter::OwnedOrShared(user_id) => Some(format!(
                r#"creator_id == {} || visibility in ["PUBLIC", "PROTECTED"]"#,
                user_id
            )),
        }
    }

    /// Restrict `find`; the clause is added as its own conjunct
    pub fn apply(&self, find: &mut FindMemo) {
        match self {
            VisibilityFilter::PublicOnly => {
                find.visibility_list = vec![Visibility::Public];
            }
            VisibilityFilter::OwnedOrShared(_) => {
                if let Some(expression) = self.expression() {
                    find.filters.push(expression);
                }
            }
        }
    }
}

/// Row-level restriction for `caller`
pub fn list_filter(caller: &Caller) -> VisibilityFilter {
    match caller {
        Caller::Anonymous => VisibilityFilter::PublicOnly,
        Caller::User(user_id) => VisibilityFilter::OwnedOrShared(*user_id),
    }
}
