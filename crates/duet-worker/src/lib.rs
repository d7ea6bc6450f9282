pub mod error;
pub mod runtime;
pub mod types;

pub use error::{Result, WorkerError};
pub use runtime::{WorkerRuntime, DEFAULT_MAX_TOOL_ITERATIONS};
pub use types::ExecutionResult;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use rusqlite::Connection;

    use duet_llm::{ChatRequest, ChatResponse, ContentBlock, LlmClient, ProviderError};
    use duet_roster::{LogStore, WorkerRoster};
    use duet_tools::{ExecutionContext, PermissionLevel, ToolRegistry};

    use super::*;

    struct StubLlm {
        responses: std::sync::Mutex<Vec<ChatResponse>>,
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _req: &ChatRequest) -> Result<ChatResponse, ProviderError> {
            let mut responses = self.responses.lock().unwrap();
            Ok(responses.remove(0))
        }
    }

    fn make_roster() -> Arc<WorkerRoster> {
        let conn = Connection::open_in_memory().unwrap();
        let log_store = LogStore::new(conn).unwrap();
        Arc::new(WorkerRoster::new(log_store))
    }

    #[tokio::test]
    async fn execute_returns_ok_when_no_tool_use() {
        let llm = Arc::new(StubLlm {
            responses: std::sync::Mutex::new(vec![ChatResponse {
                content_blocks: vec![ContentBlock::Text {
                    text: "all done".to_string(),
                }],
                stop_reason: "end_turn".to_string(),
            }]),
        });
        let tools = Arc::new(ToolRegistry::new());
        let roster = make_roster();
        let runtime = WorkerRuntime::new(llm, tools, roster, "test-model".to_string(), 1024);
        let ctx = ExecutionContext::new(PermissionLevel::User);

        let result = runtime.execute("w1", "do the thing", &ctx).await.unwrap();
        assert!(result.ok);
        assert_eq!(result.response_text, "all done");
        assert_eq!(result.iteration_count, 1);
    }

    #[tokio::test]
    async fn execute_fails_after_max_iterations_of_tool_use() {
        let tool_use_forever = ChatResponse {
            content_blocks: vec![ContentBlock::ToolUse {
                id: "t".to_string(),
                name: "nonexistent".to_string(),
                input: serde_json::json!({}),
            }],
            stop_reason: "tool_use".to_string(),
        };
        let responses = (0..DEFAULT_MAX_TOOL_ITERATIONS)
            .map(|_| tool_use_forever.clone())
            .collect();
        let llm = Arc::new(StubLlm {
            responses: std::sync::Mutex::new(responses),
        });
        let tools = Arc::new(ToolRegistry::new());
        let roster = make_roster();
        let runtime = WorkerRuntime::new(llm, tools, roster, "test-model".to_string(), 1024);
        let ctx = ExecutionContext::new(PermissionLevel::User);

        let result = runtime.execute("w2", "loop forever", &ctx).await.unwrap();
        assert!(!result.ok);
        assert_eq!(result.error_text.as_deref(), Some("max iterations reached"));
        assert_eq!(result.iteration_count, DEFAULT_MAX_TOOL_ITERATIONS);
    }
}
