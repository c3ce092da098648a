//! Tool argument sets
//!
//! These structs are both the typed inputs of [`MemoService`](super::MemoService)
//! and the JSON schemas advertised for each tool. Enumerated strings are
//! declared in the schema but validated by the service, so a bad value is a
//! per-call failure rather than a protocol error.

use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};

fn string_enum(values: &[&str]) -> Schema {
    SchemaObject {
        instance_type: Some(InstanceType::String.into()),
        enum_values: Some(values.iter().map(|v| serde_json::json!(v)).collect()),
        ..Default::default()
    }
    .into()
}

fn visibility_schema(_: &mut SchemaGenerator) -> Schema {
    string_enum(&["PRIVATE", "PROTECTED", "PUBLIC"])
}

fn state_schema(_: &mut SchemaGenerator) -> Schema {
    string_enum(&["NORMAL", "ARCHIVED"])
}

/// Arguments of list_memos
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListMemosArgs {
    /// Maximum memos to return (1-100, default 20)
    #[serde(default)]
    pub page_size: Option<f64>,
    /// Zero-based page index for pagination (default 0)
    #[serde(default)]
    pub page: Option<f64>,
    /// Filter by state: NORMAL (default) or ARCHIVED
    #[serde(default)]
    #[schemars(schema_with = "state_schema")]
    pub state: Option<String>,
    /// When true, pinned memos appear first (default false)
    #[serde(default)]
    pub order_by_pinned: Option<bool>,
    /// Optional CEL filter, e.g. content.contains("keyword") or tags.exists(t, t == "work")
    #[serde(default)]
    pub filter: Option<String>,
}

/// Arguments naming a single memo
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct MemoNameArgs {
    /// Memo resource name, e.g. "memos/abc123"
    #[serde(default)]
    pub name: String,
}

/// Arguments of create_memo
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CreateMemoArgs {
    /// Memo content in Markdown. Use #tag syntax for tagging.
    #[serde(default)]
    pub content: String,
    /// Visibility (default: PRIVATE)
    #[serde(default)]
    #[schemars(schema_with = "visibility_schema")]
    pub visibility: Option<String>,
}

/// Arguments of update_memo; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateMemoArgs {
    /// Memo resource name, e.g. "memos/abc123"
    #[serde(default)]
    pub name: String,
    /// New Markdown content
    #[serde(default)]
    pub content: Option<String>,
    /// New visibility
    #[serde(default)]
    #[schemars(schema_with = "visibility_schema")]
    pub visibility: Option<String>,
    /// Pin or unpin the memo
    #[serde(default, deserialize_with = "present_bool")]
    pub pinned: Option<bool>,
    /// Set to ARCHIVED to archive, NORMAL to restore
    #[serde(default)]
    #[schemars(schema_with = "state_schema")]
    pub state: Option<String>,
}

/// A present key always yields `Some`; `null` counts as `false`
fn present_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<bool>::deserialize(deserializer)?.unwrap_or(false)))
}

/// Arguments of search_memos
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchMemosArgs {
    /// Text to search for in memo content
    #[serde(default)]
    pub query: String,
}

/// Arguments of create_memo_comment
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CreateCommentArgs {
    /// Memo resource name to comment on, e.g. "memos/abc123"
    #[serde(default)]
    pub name: String,
    /// Comment content in Markdown
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_empty_object() {
        let args: ListMemosArgs = serde_json::from_str("{}").unwrap();
        assert!(args.page_size.is_none());
        assert!(args.state.is_none());
        assert!(args.order_by_pinned.is_none());
    }

    #[test]
    fn test_update_args_pinned_false_is_present() {
        let args: UpdateMemoArgs =
            serde_json::from_str(r#"{"name":"memos/a","pinned":false}"#).unwrap();
        assert_eq!(args.pinned, Some(false));
        assert!(args.content.is_none());
    }

    #[test]
    fn test_update_args_pinned_null_unpins() {
        let args: UpdateMemoArgs =
            serde_json::from_str(r#"{"name":"memos/a","pinned":null}"#).unwrap();
        assert_eq!(args.pinned, Some(false));

        let args: UpdateMemoArgs = serde_json::from_str(r#"{"name":"memos/a"}"#).unwrap();
        assert!(args.pinned.is_none());
    }

    #[test]
    fn test_page_size_accepts_integer_and_float() {
        let args: ListMemosArgs = serde_json::from_str(r#"{"page_size":5,"page":1.0}"#).unwrap();
        assert_eq!(args.page_size, Some(5.0));
        assert_eq!(args.page, Some(1.0));
    }

    #[test]
    fn test_visibility_schema_declares_enum() {
        let schema = schemars::schema_for!(CreateMemoArgs);
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            json["properties"]["visibility"]["enum"],
            serde_json::json!(["PRIVATE", "PROTECTED", "PUBLIC"])
        );
    }
}
