use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::{ChatRequest, ChatResponse, ContentBlock, LlmClient, ProviderError};

const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client. One `web_search` server tool slot is
/// injected onto every request when the caller constructs this with
/// `web_search_max_uses` set — the provider runs the search itself and
/// hands back a `server_tool_use` block alongside its text.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    web_search_max_uses: Option<u32>,
}

impl AnthropicClient {
    pub fn new(api_key: String, base_url: Option<String>, web_search_max_uses: Option<u32>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.anthropic.com".to_string()),
            web_search_max_uses,
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = build_request_body(req, self.web_search_max_uses);
        let url = format!("{}/v1/messages", self.base_url);

        debug!(model = %req.model, "sending request to Anthropic");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status == 429 {
            let retry = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5000);
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry,
            });
        }

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "Anthropic API error");
            return Err(ProviderError::Api {
                status,
                message: text,
            });
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parse_response(api_resp))
    }
}

fn build_request_body(req: &ChatRequest, web_search_max_uses: Option<u32>) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = req
        .messages
        .iter()
        .map(|m| {
            serde_json::json!({
                "role": m.role,
                "content": m.content,
            })
        })
        .collect();

    let mut body = serde_json::json!({
        "model": req.model,
        "max_tokens": req.max_output_tokens,
        "system": req.system,
        "messages": messages,
        "stream": false,
    });

    let mut tools: Vec<serde_json::Value> = req
        .tools
        .iter()
        .map(|t| {
            serde_json::json!({
                "name": t.name,
                "description": t.description,
                "input_schema": t.input_schema,
            })
        })
        .collect();

    if let Some(max_uses) = web_search_max_uses {
        tools.push(serde_json::json!({
            "type": "web_search_20250305",
            "name": "web_search",
            "max_uses": max_uses,
        }));
    }

    if !tools.is_empty() {
        body["tools"] = serde_json::Value::Array(tools);
    }

    body
}

fn parse_response(resp: ApiResponse) -> ChatResponse {
    let content_blocks = resp
        .content
        .into_iter()
        .filter_map(|block| match block {
            RawBlock::Text { text } => Some(ContentBlock::Text { text }),
            RawBlock::ToolUse { id, name, input } => Some(ContentBlock::ToolUse { id, name, input }),
            RawBlock::ServerToolUse { name } => Some(ContentBlock::ServerToolUse { name }),
            RawBlock::Unknown => None,
        })
        .collect();

    ChatResponse {
        content_blocks,
        stop_reason: resp.stop_reason.unwrap_or_default(),
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<RawBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(rename = "server_tool_use")]
    ServerToolUse { name: String },
    #[serde(other)]
    Unknown,
}
