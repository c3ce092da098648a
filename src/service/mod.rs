//! Memo tool operations
//!
//! Nine independent request/response operations over a [`MemoStore`].
//! Each call carries the caller identity and its own arguments; the
//! service keeps no state between calls.

mod args;
mod error;
mod response;

pub use args::{
    CreateCommentArgs, CreateMemoArgs, ListMemosArgs, MemoNameArgs, SearchMemosArgs,
    UpdateMemoArgs,
};
pub use error::{ToolError, ToolResult};
pub use response::{DeleteMemoResponse, ListMemosResponse, MemoJson, TagCount};

use crate::memo::{
    build_payload, extract_tags, parse_memo_uid, Caller, Memo, MemoRelation, MemoRelationType,
    UserId, Visibility,
};
use crate::policy::{can_read, ensure_owner};
use crate::query::{list_query, parse_row_status, search_query, tag_query};
use crate::store::{CreateMemo, FindMemo, FindMemoRelation, MemoLookup, MemoStore, UpdateMemo};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Validate a visibility argument
pub fn parse_visibility(s: &str) -> ToolResult<Visibility> {
    Visibility::parse(s).ok_or_else(|| {
        ToolError::Validation(format!(
            "visibility must be PRIVATE, PROTECTED, or PUBLIC; got {:?}",
            s
        ))
    })
}

fn require_user(caller: &Caller) -> ToolResult<UserId> {
    caller.user_id().ok_or(ToolError::Unauthenticated)
}

fn parse_name(name: &str) -> ToolResult<String> {
    parse_memo_uid(name)
        .map(str::to_string)
        .map_err(ToolError::Validation)
}

/// An empty string cannot be told apart from an omitted one
fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn new_uid() -> String {
    Uuid::new_v4().simple().to_string()
}

fn to_json(memos: &[Memo]) -> Vec<MemoJson> {
    memos.iter().map(MemoJson::from).collect()
}

/// Access layer between protocol calls and the memo store
#[derive(Clone)]
pub struct MemoService {
    store: Arc<dyn MemoStore>,
}

impl MemoService {
    pub fn new(store: Arc<dyn MemoStore>) -> Self {
        Self { store }
    }

    /// Look up a memo by uid, mapping absence to `NotFound`
    pub(crate) async fn fetch_by_uid(&self, uid: &str) -> ToolResult<Memo> {
        self.store
            .get_memo(&MemoLookup::Uid(uid.to_string()))
            .await
            .map_err(|e| ToolError::store("failed to get memo", e))?
            .ok_or(ToolError::NotFound)
    }

    /// Fetch by uid and require read access
    async fn fetch_readable(&self, caller: &Caller, name: &str) -> ToolResult<Memo> {
        let uid = parse_name(name)?;
        let memo = self.fetch_by_uid(&uid).await?;
        if !can_read(&memo, caller) {
            return Err(ToolError::PermissionDenied);
        }
        Ok(memo)
    }

    /// Fetch by uid and require ownership
    async fn fetch_owned(&self, user_id: UserId, name: &str) -> ToolResult<Memo> {
        let uid = parse_name(name)?;
        let memo = self.fetch_by_uid(&uid).await?;
        if let Err(err) = ensure_owner(&memo, user_id) {
            tracing::warn!("User {} denied write access to memo {}", user_id, memo.uid);
            return Err(err);
        }
        Ok(memo)
    }

    async fn find(&self, step: &'static str, find: &FindMemo) -> ToolResult<Vec<Memo>> {
        self.store
            .list_memos(find)
            .await
            .map_err(|e| ToolError::store(step, e))
    }

    /// List memos visible to the caller, one page at a time
    pub async fn list_memos(
        &self,
        caller: &Caller,
        args: &ListMemosArgs,
    ) -> ToolResult<ListMemosResponse> {
        let (find, window) = list_query(args, caller)?;
        let memos = self.find("failed to list memos", &find).await?;
        let (memos, has_more) = window.paginate(memos);
        tracing::debug!(
            "list_memos page {} (size {}): {} memos, has_more={}",
            window.page,
            window.page_size,
            memos.len(),
            has_more
        );
        Ok(ListMemosResponse {
            memos: to_json(&memos),
            has_more,
        })
    }

    /// Get one memo by name
    pub async fn get_memo(&self, caller: &Caller, args: &MemoNameArgs) -> ToolResult<MemoJson> {
        let memo = self.fetch_readable(caller, &args.name).await?;
        Ok(MemoJson::from(&memo))
    }

    /// Create a memo owned by the caller
    pub async fn create_memo(
        &self,
        caller: &Caller,
        args: &CreateMemoArgs,
    ) -> ToolResult<MemoJson> {
        let user_id = require_user(caller)?;
        if args.content.is_empty() {
            return Err(ToolError::Validation("content is required".to_string()));
        }
        let visibility = parse_visibility(args.visibility.as_deref().unwrap_or("PRIVATE"))?;

        let memo = self
            .store
            .create_memo(CreateMemo {
                uid: new_uid(),
                creator_id: user_id,
                content: args.content.clone(),
                visibility,
                payload: build_payload(&args.content),
                parent_uid: None,
            })
            .await
            .map_err(|e| ToolError::store("failed to create memo", e))?;

        tracing::info!("User {} created memo {}", user_id, memo.uid);
        Ok(MemoJson::from(&memo))
    }

    /// Apply the supplied fields to a memo the caller owns
    pub async fn update_memo(
        &self,
        caller: &Caller,
        args: &UpdateMemoArgs,
    ) -> ToolResult<MemoJson> {
        let user_id = require_user(caller)?;
        let memo = self.fetch_owned(user_id, &args.name).await?;

        let mut update = UpdateMemo::new(memo.id);
        if let Some(content) = supplied(args.content.clone()) {
            update.tags = Some(extract_tags(&content));
            update.content = Some(content);
        }
        if let Some(visibility) = supplied(args.visibility.clone()) {
            update.visibility = Some(parse_visibility(&visibility)?);
        }
        if let Some(state) = supplied(args.state.clone()) {
            update.row_status = Some(parse_row_status(&state)?);
        }
        update.pinned = args.pinned;

        self.store
            .update_memo(&update)
            .await
            .map_err(|e| ToolError::store("failed to update memo", e))?;

        let updated = self
            .store
            .get_memo(&MemoLookup::Id(memo.id))
            .await
            .map_err(|e| ToolError::store("failed to fetch updated memo", e))?
            .ok_or(ToolError::NotFound)?;

        tracing::info!("User {} updated memo {}", user_id, updated.uid);
        Ok(MemoJson::from(&updated))
    }

    /// Permanently delete a memo the caller owns
    pub async fn delete_memo(
        &self,
        caller: &Caller,
        args: &MemoNameArgs,
    ) -> ToolResult<DeleteMemoResponse> {
        let user_id = require_user(caller)?;
        let memo = self.fetch_owned(user_id, &args.name).await?;

        self.store
            .delete_memo(memo.id)
            .await
            .map_err(|e| ToolError::store("failed to delete memo", e))?;

        tracing::info!("User {} deleted memo {}", user_id, memo.uid);
        Ok(DeleteMemoResponse { deleted: true })
    }

    /// Substring search over visible memo content
    pub async fn search_memos(
        &self,
        caller: &Caller,
        args: &SearchMemosArgs,
    ) -> ToolResult<Vec<MemoJson>> {
        let find = search_query(&args.query, caller)?;
        let memos = self.find("failed to search memos", &find).await?;
        tracing::debug!("search_memos '{}': {} hits", args.query, memos.len());
        Ok(to_json(&memos))
    }

    /// Comments on a memo, each re-checked against the caller
    pub async fn list_memo_comments(
        &self,
        caller: &Caller,
        args: &MemoNameArgs,
    ) -> ToolResult<Vec<MemoJson>> {
        let parent = self.fetch_readable(caller, &args.name).await?;

        let relations = self
            .store
            .list_memo_relations(&FindMemoRelation {
                related_memo_id: Some(parent.id),
                relation_type: Some(MemoRelationType::Comment),
                ..Default::default()
            })
            .await
            .map_err(|e| ToolError::store("failed to list relations", e))?;
        if relations.is_empty() {
            return Ok(Vec::new());
        }

        let find = FindMemo {
            id_list: Some(relations.iter().map(|r| r.memo_id).collect()),
            ..Default::default()
        };
        let comments = self.find("failed to list comments", &find).await?;

        let visible: Vec<MemoJson> = comments
            .iter()
            .filter(|m| can_read(m, caller))
            .map(MemoJson::from)
            .collect();
        tracing::debug!(
            "list_memo_comments {}: {} of {} visible",
            parent.uid,
            visible.len(),
            comments.len()
        );
        Ok(visible)
    }

    /// Comment on a readable memo; the comment takes the parent's visibility
    pub async fn create_memo_comment(
        &self,
        caller: &Caller,
        args: &CreateCommentArgs,
    ) -> ToolResult<MemoJson> {
        let user_id = require_user(caller)?;
        let uid = parse_name(&args.name)?;
        if args.content.is_empty() {
            return Err(ToolError::Validation("content is required".to_string()));
        }

        let parent = self.fetch_by_uid(&uid).await?;
        if !can_read(&parent, caller) {
            return Err(ToolError::PermissionDenied);
        }

        let comment = self
            .store
            .create_memo(CreateMemo {
                uid: new_uid(),
                creator_id: user_id,
                content: args.content.clone(),
                visibility: parent.visibility.clone(),
                payload: build_payload(&args.content),
                parent_uid: Some(parent.uid.clone()),
            })
            .await
            .map_err(|e| ToolError::store("failed to create comment", e))?;

        if let Err(err) = self
            .store
            .upsert_memo_relation(MemoRelation::comment(comment.id, parent.id))
            .await
        {
            tracing::warn!(
                "Linking comment {} to {} failed, removing the comment: {}",
                comment.uid,
                parent.uid,
                err
            );
            if let Err(cleanup) = self.store.delete_memo(comment.id).await {
                tracing::error!("Failed to remove unlinked comment {}: {}", comment.uid, cleanup);
            }
            return Err(ToolError::store("failed to link comment", err));
        }

        tracing::info!("User {} commented on memo {}", user_id, parent.uid);
        Ok(MemoJson::from(&comment))
    }

    /// Tag counts across visible, normal, top-level memos
    pub async fn list_tags(&self, caller: &Caller) -> ToolResult<Vec<TagCount>> {
        let memos = self.find("failed to list memos", &tag_query(caller)).await?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for memo in &memos {
            for tag in memo.tags() {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }

        let mut entries: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        Ok(entries)
    }
}
