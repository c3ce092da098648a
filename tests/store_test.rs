//! SQLite store tests
//!
//! 1. Database files persist across reopen
//! 2. Relations and the derived parent reference
//! 3. Filters and ordering

use memos_mcp::memo::{MemoRelation, MemoRelationType, RowStatus, Visibility};
use memos_mcp::store::{
    CreateMemo, FindMemo, FindMemoRelation, MemoLookup, MemoStore, SqliteMemoStore, StoreError,
    UpdateMemo,
};
use tempfile::TempDir;

fn draft(uid: &str, creator_id: i32, content: &str) -> CreateMemo {
    CreateMemo {
        uid: uid.to_string(),
        creator_id,
        content: content.to_string(),
        visibility: Visibility::Public,
        payload: memos_mcp::memo::build_payload(content),
        parent_uid: None,
    }
}

#[tokio::test]
async fn test_file_store_persists() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("memos.db");

    {
        let store = SqliteMemoStore::open(&db_path).unwrap();
        store.create_memo(draft("keep", 1, "durable #note")).await.unwrap();
    }

    let reopened = SqliteMemoStore::open(&db_path).unwrap();
    let memo = reopened
        .get_memo(&MemoLookup::Uid("keep".into()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(memo.content, "durable #note");
    assert_eq!(memo.tags(), &["note".to_string()]);
}

#[tokio::test]
async fn test_parent_uid_follows_relation() {
    let store = SqliteMemoStore::in_memory().unwrap();
    let parent = store.create_memo(draft("p", 1, "parent")).await.unwrap();
    let child = store.create_memo(draft("c", 2, "child")).await.unwrap();

    let before = store.get_memo(&MemoLookup::Id(child.id)).await.unwrap().unwrap();
    assert!(!before.is_comment());

    store
        .upsert_memo_relation(MemoRelation::comment(child.id, parent.id))
        .await
        .unwrap();
    // upsert twice keeps a single edge
    store
        .upsert_memo_relation(MemoRelation::comment(child.id, parent.id))
        .await
        .unwrap();

    let after = store.get_memo(&MemoLookup::Id(child.id)).await.unwrap().unwrap();
    assert_eq!(after.parent_uid.as_deref(), Some("p"));

    let relations = store
        .list_memo_relations(&FindMemoRelation {
            related_memo_id: Some(parent.id),
            relation_type: Some(MemoRelationType::Comment),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(relations, vec![MemoRelation::comment(child.id, parent.id)]);

    let top_level = store
        .list_memos(&FindMemo {
            exclude_comments: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(top_level.len(), 1);
    assert_eq!(top_level[0].uid, "p");
}

#[tokio::test]
async fn test_filters_are_anded() {
    let store = SqliteMemoStore::in_memory().unwrap();
    store.create_memo(draft("a", 1, "alpha #x")).await.unwrap();
    store.create_memo(draft("b", 2, "alpha #y")).await.unwrap();
    store.create_memo(draft("c", 1, "beta #x")).await.unwrap();

    let find = FindMemo {
        filters: vec![
            r#"content.contains("alpha")"#.to_string(),
            "creator_id == 1".to_string(),
        ],
        ..Default::default()
    };
    let memos = store.list_memos(&find).await.unwrap();
    assert_eq!(memos.len(), 1);
    assert_eq!(memos[0].uid, "a");
}

#[tokio::test]
async fn test_non_boolean_filter_rejected() {
    let store = SqliteMemoStore::in_memory().unwrap();
    store.create_memo(draft("a", 1, "alpha")).await.unwrap();

    let find = FindMemo {
        filters: vec!["content".to_string()],
        ..Default::default()
    };
    let err = store.list_memos(&find).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidFilter { .. }));
}

#[tokio::test]
async fn test_visibility_list_and_row_status() {
    let store = SqliteMemoStore::in_memory().unwrap();
    let public = store.create_memo(draft("pub", 1, "one")).await.unwrap();
    store
        .create_memo(CreateMemo {
            visibility: Visibility::Private,
            ..draft("priv", 1, "two")
        })
        .await
        .unwrap();
    store
        .update_memo(&UpdateMemo {
            row_status: Some(RowStatus::Archived),
            ..UpdateMemo::new(public.id)
        })
        .await
        .unwrap();

    let find = FindMemo {
        visibility_list: vec![Visibility::Public],
        row_status: Some(RowStatus::Normal),
        ..Default::default()
    };
    assert!(store.list_memos(&find).await.unwrap().is_empty());

    let find = FindMemo {
        visibility_list: vec![Visibility::Public],
        row_status: Some(RowStatus::Archived),
        ..Default::default()
    };
    assert_eq!(store.list_memos(&find).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_exclude_content() {
    let store = SqliteMemoStore::in_memory().unwrap();
    store.create_memo(draft("a", 1, "secret words #t")).await.unwrap();
    let memos = store
        .list_memos(&FindMemo {
            exclude_content: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(memos[0].content.is_empty());
    assert_eq!(memos[0].tags(), &["t".to_string()]);
}

#[tokio::test]
async fn test_delete_is_hard() {
    let store = SqliteMemoStore::in_memory().unwrap();
    let memo = store.create_memo(draft("a", 1, "x")).await.unwrap();
    store.delete_memo(memo.id).await.unwrap();
    assert!(store
        .get_memo(&MemoLookup::Id(memo.id))
        .await
        .unwrap()
        .is_none());
}
