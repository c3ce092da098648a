//! Memo resource tests
//!
//! 1. Rendered document layout (frontmatter plus body)
//! 2. URI parsing and resolution errors
//! 3. Access checks match get_memo

use memos_mcp::memo::{Caller, MemoProperty};
use memos_mcp::resource::{render_memo_markdown, ResourceError};
use memos_mcp::service::{CreateCommentArgs, CreateMemoArgs, MemoJson, MemoService};
use memos_mcp::store::SqliteMemoStore;
use std::sync::Arc;

const ALICE: Caller = Caller::User(1);
const BOB: Caller = Caller::User(2);

fn sample() -> MemoJson {
    MemoJson {
        name: "memos/abc123".into(),
        creator: "users/1".into(),
        create_time: 1700000000,
        update_time: 1700000600,
        content: "Ship the release\n\n- [ ] changelog".into(),
        visibility: "PROTECTED".into(),
        tags: vec!["work".into(), "release".into()],
        pinned: true,
        state: "NORMAL".into(),
        property: Some(MemoProperty {
            has_task_list: true,
            has_incomplete_tasks: true,
            ..Default::default()
        }),
        parent: Some("memos/root".into()),
    }
}

#[test]
fn test_render_full_document() {
    insta::assert_snapshot!(render_memo_markdown(&sample()), @r###"
    ---
    name: memos/abc123
    creator: users/1
    visibility: PROTECTED
    state: NORMAL
    pinned: true
    tags: [work, release]
    create_time: 1700000000
    update_time: 1700000600
    parent: memos/root
    ---

    Ship the release

    - [ ] changelog
    "###);
}

#[test]
fn test_render_minimal_document() {
    let memo = MemoJson {
        tags: Vec::new(),
        parent: None,
        pinned: false,
        content: String::new(),
        ..sample()
    };
    let expected = "---\n\
name: memos/abc123\n\
creator: users/1\n\
visibility: PROTECTED\n\
state: NORMAL\n\
pinned: false\n\
create_time: 1700000000\n\
update_time: 1700000600\n\
---\n\n";
    assert_eq!(render_memo_markdown(&memo), expected);
}

fn service() -> MemoService {
    MemoService::new(Arc::new(SqliteMemoStore::in_memory().unwrap()))
}

async fn create(svc: &MemoService, content: &str, visibility: &str) -> MemoJson {
    svc.create_memo(
        &ALICE,
        &CreateMemoArgs {
            content: content.into(),
            visibility: Some(visibility.into()),
        },
    )
    .await
    .unwrap()
}

fn uri(memo: &MemoJson) -> String {
    format!("memo://{}", memo.name)
}

#[tokio::test]
async fn test_read_public_resource_anonymously() {
    let svc = service();
    let memo = create(&svc, "hello #world", "PUBLIC").await;

    let doc = svc
        .read_memo_resource(&Caller::Anonymous, &uri(&memo))
        .await
        .unwrap();
    assert!(doc.starts_with(&format!("---\nname: {}\n", memo.name)));
    assert!(doc.contains("tags: [world]\n"));
    assert!(doc.ends_with("---\n\nhello #world"));
}

#[tokio::test]
async fn test_read_comment_resource_has_parent() {
    let svc = service();
    let parent = create(&svc, "parent", "PUBLIC").await;
    let reply = svc
        .create_memo_comment(
            &BOB,
            &CreateCommentArgs {
                name: parent.name.clone(),
                content: "reply".into(),
            },
        )
        .await
        .unwrap();

    let doc = svc.read_memo_resource(&BOB, &uri(&reply)).await.unwrap();
    assert!(doc.contains(&format!("parent: {}\n", parent.name)));
    assert!(doc.contains("creator: users/2\n"));
}

#[tokio::test]
async fn test_private_resource_denied() {
    let svc = service();
    let memo = create(&svc, "diary", "PRIVATE").await;

    let err = svc
        .read_memo_resource(&BOB, &uri(&memo))
        .await
        .unwrap_err();
    assert_eq!(err, ResourceError::PermissionDenied);
    assert!(svc.read_memo_resource(&ALICE, &uri(&memo)).await.is_ok());
}

#[tokio::test]
async fn test_missing_resource() {
    let svc = service();
    let err = svc
        .read_memo_resource(&ALICE, "memo://memos/nope")
        .await
        .unwrap_err();
    assert_eq!(err, ResourceError::NotFound("nope".into()));
    assert_eq!(err.to_string(), "memo not found: nope");
}

#[tokio::test]
async fn test_malformed_uris() {
    let svc = service();
    for bad in ["memo://memos/", "memos/abc", "memo://users/1", ""] {
        let err = svc.read_memo_resource(&ALICE, bad).await.unwrap_err();
        assert_eq!(err, ResourceError::InvalidUri(bad.to_string()));
    }
}
