use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level config (duet.toml + APP_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub gating: GatingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// LLM Client connection settings (spec.md §6 External Interfaces).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_response_max_tokens")]
    pub response_max_tokens: u32,
    /// Whether the server-side `web_search` tool is offered to the Interaction
    /// Orchestrator (spec.md §4.2).
    #[serde(default)]
    pub enable_web_search: bool,
    #[serde(default = "default_web_search_max_uses")]
    pub web_search_max_uses: u32,
    pub anthropic: Option<AnthropicConfig>,
    pub openai: Option<OpenAiConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    pub api_key: String,
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

/// Interaction Orchestrator loop bound (spec.md §3: `MAX_TOOL_ITERATIONS = 8`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_tool_iterations: default_max_tool_iterations(),
        }
    }
}

/// Execution Batch Coordinator bounds (spec.md §4.3/§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_entries_per_worker")]
    pub max_entries_per_worker: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_entries_per_worker: default_max_entries_per_worker(),
        }
    }
}

/// Conversation Gating Layer tunables (spec.md §4.1, Open Questions §9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatingConfig {
    #[serde(default = "default_echo_ttl_seconds")]
    pub echo_ttl_seconds: u64,
    #[serde(default = "default_rate_window_seconds")]
    pub rate_window_seconds: u64,
    #[serde(default = "default_rate_max")]
    pub rate_max: u32,
    #[serde(default = "default_history_keep")]
    pub history_keep: usize,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            echo_ttl_seconds: default_echo_ttl_seconds(),
            rate_window_seconds: default_rate_window_seconds(),
            rate_max: default_rate_max(),
            history_keep: default_history_keep(),
        }
    }
}

fn default_port() -> u16 {
    8787
}
fn default_bind() -> String {
    "127.0.0.1".to_string()
}
fn default_model() -> String {
    "claude-sonnet-4-6".to_string()
}
fn default_response_max_tokens() -> u32 {
    4096
}
fn default_web_search_max_uses() -> u32 {
    3
}
fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}
fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_max_tool_iterations() -> u32 {
    8
}
fn default_timeout_seconds() -> u64 {
    90
}
fn default_max_entries_per_worker() -> usize {
    100
}
fn default_echo_ttl_seconds() -> u64 {
    10
}
fn default_rate_window_seconds() -> u64 {
    60
}
fn default_rate_max() -> u32 {
    8
}
fn default_history_keep() -> usize {
    20
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.duet/duet.db", home)
}

impl Config {
    /// Load config from a TOML file with APP_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.duet/duet.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: Config = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("APP_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.duet/duet.toml", home)
}
