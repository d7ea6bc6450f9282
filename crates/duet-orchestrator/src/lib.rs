pub mod ack;
pub mod citation;
pub mod orchestrator;
pub mod prompt;
pub mod tools;
pub mod types;

pub use orchestrator::{Orchestrator, DEFAULT_MAX_TOOL_ITERATIONS};
pub use types::InteractionResult;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rusqlite::Connection;

    use duet_batch::BatchRegistry;
    use duet_core::types::{ChatId, TriggerKind};
    use duet_llm::{ChatRequest, ChatResponse, ContentBlock, LlmClient, ProviderError};
    use duet_memory::ConversationStore;
    use duet_roster::{LogStore, WorkerRoster};
    use duet_tools::ToolRegistry;
    use duet_transport::{ReactionKind, Transport, TransportError};
    use duet_worker::WorkerRuntime;

    use super::*;

    struct StubLlm {
        responses: Mutex<Vec<ChatResponse>>,
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

    struct RecordingTransport {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send_text(
            &self,
            _chat_id: &str,
            text: &str,
            _temp_id: Option<&str>,
        ) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn send_reaction(
            &self,
            _chat_id: &str,
            _target_msg_id: &str,
            _kind: ReactionKind,
        ) -> Result<(), TransportError> {
            Ok(())
        }

        async fn start_typing(&self, _chat_id: &str) {}
        async fn stop_typing(&self, _chat_id: &str) {}
    }

    fn make_batch_registry() -> Arc<BatchRegistry> {
        let conn = Connection::open_in_memory().unwrap();
        let roster = Arc::new(WorkerRoster::new(LogStore::new(conn).unwrap()));
        let worker_llm = Arc::new(StubLlm {
            responses: Mutex::new(vec![ChatResponse {
                content_blocks: vec![ContentBlock::Text {
                    text: "worker done".to_string(),
                }],
                stop_reason: "end_turn".to_string(),
            }]),
        });
        let runtime = Arc::new(WorkerRuntime::new(
            worker_llm,
            Arc::new(ToolRegistry::new()),
            roster,
            "test-model".to_string(),
            1024,
        ));
        Arc::new(BatchRegistry::new(runtime, 90, Arc::new(|_, _| {})))
    }

    fn text_response(text: &str) -> ChatResponse {
        ChatResponse {
            content_blocks: vec![ContentBlock::Text {
                text: text.to_string(),
            }],
            stop_reason: "end_turn".to_string(),
        }
    }

    fn tool_use_response(name: &str, input: serde_json::Value) -> ChatResponse {
        ChatResponse {
            content_blocks: vec![ContentBlock::ToolUse {
                id: "t1".to_string(),
                name: name.to_string(),
                input,
            }],
            stop_reason: "tool_use".to_string(),
        }
    }

    #[tokio::test]
    async fn terminal_text_response_sends_bubbles_and_succeeds() {
        let llm = Arc::new(StubLlm {
            responses: Mutex::new(vec![text_response("hello || there")]),
        });
        let transport = Arc::new(RecordingTransport::new());
        let memory = Arc::new(ConversationStore::new());
        let batch = make_batch_registry();
        let orchestrator = Orchestrator::new(
            llm,
            Arc::clone(&transport) as Arc<dyn Transport>,
            Arc::clone(&memory),
            batch,
            "test-model".to_string(),
            1024,
        );

        let chat_id = ChatId::from("c1");
        let result = orchestrator.run(TriggerKind::User, "hi", &chat_id, false).await;

        assert!(result.ok);
        assert_eq!(
            transport.sent.lock().unwrap().clone(),
            vec!["hello".to_string(), "there".to_string()]
        );
    }

    #[tokio::test]
    async fn send_to_user_tool_then_terminal_response() {
        let llm = Arc::new(StubLlm {
            responses: Mutex::new(vec![
                tool_use_response("send_to_user", serde_json::json!({"message": "working on it"})),
                text_response("all set"),
            ]),
        });
        let transport = Arc::new(RecordingTransport::new());
        let memory = Arc::new(ConversationStore::new());
        let batch = make_batch_registry();
        let orchestrator = Orchestrator::new(
            llm,
            Arc::clone(&transport) as Arc<dyn Transport>,
            memory,
            batch,
            "test-model".to_string(),
            1024,
        );

        let chat_id = ChatId::from("c2");
        let result = orchestrator.run(TriggerKind::User, "please help", &chat_id, false).await;

        assert!(result.ok);
        assert_eq!(
            transport.sent.lock().unwrap().clone(),
            vec!["working on it".to_string(), "all set".to_string()]
        );
    }

    #[tokio::test]
    async fn react_without_prior_inbound_id_reports_missing_target() {
        let llm = Arc::new(StubLlm {
            responses: Mutex::new(vec![
                tool_use_response("react", serde_json::json!({"reaction": "like"})),
                text_response("done"),
            ]),
        });
        let transport = Arc::new(RecordingTransport::new());
        let memory = Arc::new(ConversationStore::new());
        let batch = make_batch_registry();
        let orchestrator = Orchestrator::new(
            llm,
            Arc::clone(&transport) as Arc<dyn Transport>,
            memory,
            batch,
            "test-model".to_string(),
            1024,
        );

        let chat_id = ChatId::from("c3");
        let result = orchestrator.run(TriggerKind::User, "nice", &chat_id, false).await;

        assert!(result.ok);
    }

    #[tokio::test]
    async fn max_iterations_with_only_wait_calls_fails_without_extra_message() {
        let responses = (0..DEFAULT_MAX_TOOL_ITERATIONS)
            .map(|_| tool_use_response("wait", serde_json::json!({"reason": "thinking"})))
            .collect();
        let llm = Arc::new(StubLlm {
            responses: Mutex::new(responses),
        });
        let transport = Arc::new(RecordingTransport::new());
        let memory = Arc::new(ConversationStore::new());
        let batch = make_batch_registry();
        let orchestrator = Orchestrator::new(
            llm,
            Arc::clone(&transport) as Arc<dyn Transport>,
            memory,
            batch,
            "test-model".to_string(),
            1024,
        );

        let chat_id = ChatId::from("c4");
        let result = orchestrator.run(TriggerKind::User, "keep going", &chat_id, false).await;

        assert!(!result.ok);
        assert_eq!(result.error_text.as_deref(), Some("max iterations reached"));
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
