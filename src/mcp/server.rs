//! rmcp server handler
//!
//! Exposes the memo tools, the `memo://memos/{uid}` resource template and
//! the capture/review prompts over MCP. Tool failures are returned as
//! error results so the session continues; resource and prompt failures
//! are protocol errors.

use crate::memo::Caller;
use crate::prompts::{prompt_specs, render_prompt, PromptError};
use crate::resource::{
    ResourceError, MEMO_MIME_TYPE, MEMO_RESOURCE_DESCRIPTION, MEMO_RESOURCE_NAME,
    MEMO_URI_TEMPLATE,
};
use crate::service::{
    CreateCommentArgs, CreateMemoArgs, ListMemosArgs, MemoNameArgs, MemoService, SearchMemosArgs,
    ToolResult, UpdateMemoArgs,
};
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, GetPromptRequestParam, GetPromptResult, Implementation,
    ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult, PaginatedRequestParam,
    Prompt, PromptArgument, PromptMessage, PromptMessageContent, PromptMessageRole,
    RawResourceTemplate, ReadResourceRequestParam, ReadResourceResult, ResourceContents,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{tool, Error as McpError, RoleServer, ServerHandler};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Encode a tool outcome as a single JSON text content
fn tool_result<T: Serialize>(result: ToolResult<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => {
            let text = serde_json::to_string(&value)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(err) => {
            tracing::debug!("Tool call failed: {}", err);
            Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
        }
    }
}

impl From<ResourceError> for McpError {
    fn from(err: ResourceError) -> Self {
        let message = err.to_string();
        match err {
            ResourceError::InvalidUri(_) => McpError::invalid_params(message, None),
            ResourceError::NotFound(_) => McpError::resource_not_found(message, None),
            ResourceError::PermissionDenied => McpError::invalid_request(message, None),
            ResourceError::Store(_) => McpError::internal_error(message, None),
        }
    }
}

impl From<PromptError> for McpError {
    fn from(err: PromptError) -> Self {
        McpError::invalid_params(err.to_string(), None)
    }
}

/// Prompt arguments arrive as a JSON object; non-string values are stringified
fn prompt_arguments(args: Option<&serde_json::Map<String, Value>>) -> HashMap<String, String> {
    args.into_iter()
        .flatten()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                v => v.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// MCP server for one caller identity
#[derive(Clone)]
pub struct MemosMcpServer {
    service: Arc<MemoService>,
    caller: Caller,
}

#[tool(tool_box)]
impl MemosMcpServer {
    pub fn new(service: Arc<MemoService>, caller: Caller) -> Self {
        Self { service, caller }
    }

    #[tool(
        description = "List memos visible to the caller. Authenticated users see their own memos plus public and protected memos; unauthenticated callers see only public memos."
    )]
    async fn list_memos(
        &self,
        #[tool(aggr)] args: ListMemosArgs,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.service.list_memos(&self.caller, &args).await)
    }

    #[tool(
        description = "Get a single memo by resource name. Public memos are accessible without authentication."
    )]
    async fn get_memo(&self, #[tool(aggr)] args: MemoNameArgs) -> Result<CallToolResult, McpError> {
        tool_result(self.service.get_memo(&self.caller, &args).await)
    }

    #[tool(description = "Create a new memo. Requires authentication.")]
    async fn create_memo(
        &self,
        #[tool(aggr)] args: CreateMemoArgs,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.service.create_memo(&self.caller, &args).await)
    }

    #[tool(
        description = "Update a memo's content, visibility, pin state, or archive state. Requires authentication and ownership. Omit any field to leave it unchanged."
    )]
    async fn update_memo(
        &self,
        #[tool(aggr)] args: UpdateMemoArgs,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.service.update_memo(&self.caller, &args).await)
    }

    #[tool(description = "Permanently delete a memo. Requires authentication and ownership.")]
    async fn delete_memo(
        &self,
        #[tool(aggr)] args: MemoNameArgs,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.service.delete_memo(&self.caller, &args).await)
    }

    #[tool(
        description = "Search memo content. Authenticated users search their own and visible memos; unauthenticated callers search public memos only."
    )]
    async fn search_memos(
        &self,
        #[tool(aggr)] args: SearchMemosArgs,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.service.search_memos(&self.caller, &args).await)
    }

    #[tool(
        description = "List comments on a memo. Visibility rules for comments match those of the parent memo."
    )]
    async fn list_memo_comments(
        &self,
        #[tool(aggr)] args: MemoNameArgs,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.service.list_memo_comments(&self.caller, &args).await)
    }

    #[tool(
        description = "Add a comment to a memo. The comment inherits the parent memo's visibility. Requires authentication."
    )]
    async fn create_memo_comment(
        &self,
        #[tool(aggr)] args: CreateCommentArgs,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.service.create_memo_comment(&self.caller, &args).await)
    }

    #[tool(
        description = "List all tags with their memo counts. Authenticated users see tags from their own and visible memos; unauthenticated callers see tags from public memos only. Results are sorted by count descending, then alphabetically."
    )]
    async fn list_tags(&self) -> Result<CallToolResult, McpError> {
        tool_result(self.service.list_tags(&self.caller).await)
    }
}

#[tool(tool_box)]
impl ServerHandler for MemosMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Memos note server. Use the memo tools to list, search, create and edit notes, read memo://memos/{uid} resources, or start from the capture and review prompts."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "Memos".into(),
                version: crate::VERSION.into(),
            },
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: Vec::new(),
            next_cursor: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        let template = RawResourceTemplate {
            uri_template: MEMO_URI_TEMPLATE.to_string(),
            name: MEMO_RESOURCE_NAME.to_string(),
            description: Some(MEMO_RESOURCE_DESCRIPTION.to_string()),
            mime_type: Some(MEMO_MIME_TYPE.to_string()),
        };
        Ok(ListResourceTemplatesResult {
            resource_templates: vec![template.no_annotation()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self
            .service
            .read_memo_resource(&self.caller, &request.uri)
            .await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: request.uri,
                mime_type: Some(MEMO_MIME_TYPE.to_string()),
                text,
            }],
        })
    }

    async fn list_prompts(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        let prompts = prompt_specs()
            .iter()
            .map(|spec| Prompt {
                name: spec.name.to_string(),
                description: Some(spec.description.to_string()),
                arguments: Some(
                    spec.arguments
                        .iter()
                        .map(|arg| PromptArgument {
                            name: arg.name.to_string(),
                            description: Some(arg.description.to_string()),
                            required: Some(arg.required),
                        })
                        .collect(),
                ),
            })
            .collect();
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let args = prompt_arguments(request.arguments.as_ref());
        let rendered = render_prompt(&request.name, &args)?;
        Ok(GetPromptResult {
            description: Some(rendered.description),
            messages: vec![PromptMessage {
                role: PromptMessageRole::User,
                content: PromptMessageContent::Text {
                    text: rendered.text,
                },
            }],
        })
    }
}
