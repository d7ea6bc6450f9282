pub mod anthropic;
pub mod client;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use client::{ChatRequest, ChatResponse, ContentBlock, LlmClient, Message, ProviderError, Role, ToolDefinition};
pub use openai::OpenAiClient;
