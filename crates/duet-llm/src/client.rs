use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use duet_core::types::ChatId;

/// A single message in the conversation history handed to the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Tool definition sent to the LLM API (spec.md §4.2/§4.4 client tool sets).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// One content block of a model response. The vocabulary is fixed at three
/// variants (spec.md §6): plain text, a client-side tool call the caller
/// must execute, and a server-side tool invocation (`web_search`) the
/// provider already ran before returning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ServerToolUse { name: String },
}

/// Request to an LLM provider (spec.md §6: `complete(system, tools,
/// messages, max_output_tokens, chat_id?)`).
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub max_output_tokens: u32,
    /// Present only so a provider can correlate server-side tool usage
    /// (e.g. web search quota) back to a conversation; never sent as part
    /// of the wire payload itself.
    pub chat_id: Option<ChatId>,
}

/// Response from an LLM provider: the block list plus the stop reason.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content_blocks: Vec<ContentBlock>,
    pub stop_reason: String,
}

impl ChatResponse {
    /// Concatenated text from every `Text` block, in order.
    pub fn text(&self) -> String {
        self.content_blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Every `ToolUse` block, in order.
    pub fn tool_uses(&self) -> impl Iterator<Item = (&str, &str, &serde_json::Value)> {
        self.content_blocks.iter().filter_map(|b| match b {
            ContentBlock::ToolUse { id, name, input } => Some((id.as_str(), name.as_str(), input)),
            _ => None,
        })
    }

    pub fn has_tool_use(&self) -> bool {
        self.content_blocks
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}

/// Common interface for all LLM providers (spec.md §6 LLM Client).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &str;

    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}
