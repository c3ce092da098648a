//! Prompt templates
//!
//! Two canned instructions that steer an agent toward the memo tools.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("{0} argument is required")]
    MissingArgument(&'static str),

    #[error("unknown prompt: {0}")]
    UnknownPrompt(String),
}

/// Declared prompt argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptArgumentSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Declared prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [PromptArgumentSpec],
}

/// Rendered prompt: a description and one user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub description: String,
    pub text: String,
}

pub const CAPTURE: PromptSpec = PromptSpec {
    name: "capture",
    description: "Capture a thought, idea, or note as a new memo. Use this prompt when the user wants to quickly save something. The assistant will call create_memo with the provided content.",
    arguments: &[
        PromptArgumentSpec {
            name: "content",
            description: "The text to save as a memo",
            required: true,
        },
        PromptArgumentSpec {
            name: "tags",
            description: "Comma-separated tags to apply, e.g. \"work,project\"",
            required: false,
        },
    ],
};

pub const REVIEW: PromptSpec = PromptSpec {
    name: "review",
    description: "Search and review memos on a given topic. The assistant will call search_memos and summarise the results.",
    arguments: &[PromptArgumentSpec {
        name: "topic",
        description: "Topic or keyword to search for",
        required: true,
    }],
};

/// All prompts, in listing order
pub fn prompt_specs() -> [PromptSpec; 2] {
    [CAPTURE, REVIEW]
}

fn argument<'a>(args: &'a HashMap<String, String>, name: &str) -> &'a str {
    args.get(name).map(String::as_str).unwrap_or("")
}

fn render_capture(args: &HashMap<String, String>) -> Result<RenderedPrompt, PromptError> {
    let content = argument(args, "content");
    if content.is_empty() {
        return Err(PromptError::MissingArgument("content"));
    }
    let mut text = format!(
        "Please save the following as a new private memo using the create_memo tool.\n\nContent:\n{}",
        content
    );
    let tags = argument(args, "tags");
    if !tags.is_empty() {
        text.push_str(&format!(
            "\n\nAppend these tags inline using #tag syntax: {}",
            tags
        ));
    }
    Ok(RenderedPrompt {
        description: "Capture a memo".to_string(),
        text,
    })
}

fn render_review(args: &HashMap<String, String>) -> Result<RenderedPrompt, PromptError> {
    let topic = argument(args, "topic");
    if topic.is_empty() {
        return Err(PromptError::MissingArgument("topic"));
    }
    Ok(RenderedPrompt {
        description: format!("Review memos about {:?}", topic),
        text: format!(
            "Please use the search_memos tool to find memos about {:?}, then provide a concise summary of what has been written on this topic, grouped by theme. Include the memo names so the user can reference them.",
            topic
        ),
    })
}

/// Render prompt `name` with string arguments
pub fn render_prompt(
    name: &str,
    args: &HashMap<String, String>,
) -> Result<RenderedPrompt, PromptError> {
    match name {
        "capture" => render_capture(args),
        "review" => render_review(args),
        other => Err(PromptError::UnknownPrompt(other.to_string())),
    }
}
