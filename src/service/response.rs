//! Canonical response shapes
//!
//! Every memo leaving the access layer goes through [`MemoJson`].

use crate::memo::{creator_name, memo_name, Memo, MemoProperty};
use serde::{Deserialize, Serialize};

/// Serialized memo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoJson {
    /// `memos/<uid>`
    pub name: String,
    /// `users/<id>`
    pub creator: String,
    pub create_time: i64,
    pub update_time: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    pub visibility: String,
    pub tags: Vec<String>,
    pub pinned: bool,
    pub state: String,
    /// Present only when at least one flag is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<MemoProperty>,
    /// `memos/<uid>` of the parent, for comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl From<&Memo> for MemoJson {
    fn from(memo: &Memo) -> Self {
        let property = memo
            .payload
            .as_ref()
            .and_then(|p| p.property)
            .filter(MemoProperty::any);
        Self {
            name: memo_name(&memo.uid),
            creator: creator_name(memo.creator_id),
            create_time: memo.created_ts,
            update_time: memo.updated_ts,
            content: memo.content.clone(),
            visibility: memo.visibility.to_string(),
            tags: memo.tags().to_vec(),
            pinned: memo.pinned,
            state: memo.row_status.to_string(),
            property,
            parent: memo.parent_uid.as_deref().map(memo_name),
        }
    }
}

/// list_memos response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMemosResponse {
    pub memos: Vec<MemoJson>,
    pub has_more: bool,
}

/// delete_memo response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteMemoResponse {
    pub deleted: bool,
}

/// Tag with the number of memos carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memo::{MemoPayload, RowStatus, Visibility};

    fn memo() -> Memo {
        Memo {
            id: 9,
            uid: "abc".to_string(),
            creator_id: 2,
            created_ts: 100,
            updated_ts: 200,
            row_status: RowStatus::Normal,
            content: "hello".to_string(),
            visibility: Visibility::Protected,
            pinned: true,
            payload: None,
            parent_uid: None,
        }
    }

    #[test]
    fn test_canonical_fields() {
        let json = serde_json::to_value(MemoJson::from(&memo())).unwrap();
        assert_eq!(json["name"], "memos/abc");
        assert_eq!(json["creator"], "users/2");
        assert_eq!(json["create_time"], 100);
        assert_eq!(json["update_time"], 200);
        assert_eq!(json["visibility"], "PROTECTED");
        assert_eq!(json["state"], "NORMAL");
        assert_eq!(json["pinned"], true);
        assert_eq!(json["tags"], serde_json::json!([]));
        assert!(json.get("property").is_none());
        assert!(json.get("parent").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_empty_content_omitted() {
        let mut m = memo();
        m.content.clear();
        let json = serde_json::to_value(MemoJson::from(&m)).unwrap();
        assert!(json.get("content").is_none());
    }

    #[test]
    fn test_all_false_property_omitted() {
        let mut m = memo();
        m.payload = Some(MemoPayload {
            tags: vec!["t".into()],
            property: Some(MemoProperty::default()),
        });
        let json = MemoJson::from(&m);
        assert!(json.property.is_none());
        assert_eq!(json.tags, vec!["t"]);
    }

    #[test]
    fn test_property_and_parent_present() {
        let mut m = memo();
        m.payload = Some(MemoPayload {
            tags: Vec::new(),
            property: Some(MemoProperty {
                has_task_list: true,
                has_incomplete_tasks: true,
                ..Default::default()
            }),
        });
        m.parent_uid = Some("root".into());
        let json = serde_json::to_value(MemoJson::from(&m)).unwrap();
        assert_eq!(json["parent"], "memos/root");
        assert_eq!(
            json["property"],
            serde_json::json!({
                "has_link": false,
                "has_task_list": true,
                "has_code": false,
                "has_incomplete_tasks": true
            })
        );
    }
}
