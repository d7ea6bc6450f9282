//! Per-conversation registry of Batch Coordinators (spec.md §4.3: a Batch
//! Coordinator tracks in-flight delegations for a single conversation, so
//! the process needs one instance per chat, not one globally). Grounded on
//! the `get_or_create` shape of `duet-roster::manager::WorkerRoster`.

use std::sync::Arc;

use dashmap::DashMap;

use duet_core::types::ChatId;
use duet_worker::WorkerRuntime;

use crate::coordinator::BatchCoordinator;

/// Invoked with `(chat_id, aggregate_payload)` whenever a conversation's
/// batch finishes (spec.md §4.3 `on_batch_complete`, generalized with the
/// originating chat id so the caller can dispatch a fresh trigger there).
pub type OnBatchComplete = Arc<dyn Fn(ChatId, String) + Send + Sync>;

pub struct BatchRegistry {
    worker_runtime: Arc<WorkerRuntime>,
    timeout_seconds: u64,
    on_batch_complete: OnBatchComplete,
    coordinators: DashMap<ChatId, Arc<BatchCoordinator>>,
}

impl BatchRegistry {
    pub fn new(
        worker_runtime: Arc<WorkerRuntime>,
        timeout_seconds: u64,
        on_batch_complete: OnBatchComplete,
    ) -> Self {
        Self {
            worker_runtime,
            timeout_seconds,
            on_batch_complete,
            coordinators: DashMap::new(),
        }
    }

    /// The Batch Coordinator for `chat_id`, creating one (with its callback
    /// already wired) on first reference.
    pub fn get_or_create(&self, chat_id: &ChatId) -> Arc<BatchCoordinator> {
        let entry = self.coordinators.entry(chat_id.clone()).or_insert_with(|| {
            let coordinator = Arc::new(
                BatchCoordinator::new(Arc::clone(&self.worker_runtime))
                    .with_timeout_seconds(self.timeout_seconds),
            );
            let callback_chat_id = chat_id.clone();
            let on_complete = Arc::clone(&self.on_batch_complete);
            coordinator.set_on_batch_complete(move |payload| {
                on_complete(callback_chat_id.clone(), payload);
            });
            coordinator
        });
        Arc::clone(&entry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rusqlite::Connection;

    use duet_llm::{ChatRequest, ChatResponse, ContentBlock, LlmClient, ProviderError};
    use duet_roster::{LogStore, WorkerRoster};
    use duet_tools::{ExecutionContext, PermissionLevel, ToolRegistry};

    use super::*;

    struct StubLlm;

    #[async_trait]
    impl LlmClient for StubLlm {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _req: &ChatRequest) -> Result<ChatResponse, ProviderError> {
            Ok(ChatResponse {
                content_blocks: vec![ContentBlock::Text {
                    text: "ok".to_string(),
                }],
                stop_reason: "end_turn".to_string(),
            })
        }
    }

    fn make_registry(on_complete: OnBatchComplete) -> BatchRegistry {
        let conn = Connection::open_in_memory().unwrap();
        let roster = Arc::new(WorkerRoster::new(LogStore::new(conn).unwrap()));
        let runtime = Arc::new(make_worker_runtime(roster));
        BatchRegistry::new(runtime, 90, on_complete)
    }

    fn make_worker_runtime(roster: Arc<WorkerRoster>) -> duet_worker::WorkerRuntime {
        duet_worker::WorkerRuntime::new(
            Arc::new(StubLlm),
            Arc::new(ToolRegistry::new()),
            roster,
            "test-model".to_string(),
            1024,
        )
    }

    #[test]
    fn returns_the_same_coordinator_for_the_same_chat() {
        let registry = make_registry(Arc::new(|_, _| {}));
        let chat = ChatId::from("c1");
        let a = registry.get_or_create(&chat);
        let b = registry.get_or_create(&chat);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn distinct_chats_get_distinct_coordinators() {
        let registry = make_registry(Arc::new(|_, _| {}));
        let a = registry.get_or_create(&ChatId::from("c1"));
        let b = registry.get_or_create(&ChatId::from("c2"));
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn callback_receives_the_owning_chat_id() {
        let seen: Arc<Mutex<Vec<(ChatId, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let registry = make_registry(Arc::new(move |chat_id, payload| {
            seen_clone.lock().unwrap().push((chat_id, payload));
        }));

        let chat = ChatId::from("c1");
        let coordinator = registry.get_or_create(&chat);
        let ctx = ExecutionContext::new(PermissionLevel::User);
        coordinator.execute_worker("alpha", "do it", None, &ctx).await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, chat);
    }
}
