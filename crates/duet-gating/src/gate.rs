//! Conversation Gating Layer (spec.md §4.1): converts raw transport events
//! into well-formed Orchestrator invocations, drops events that must not
//! trigger a response, and guarantees typing-indicator balance. Grounded on
//! `DiscordHandler::message`'s dispatch shape (start typing, send an
//! acknowledgment, hand off to the agentic turn, always resolve the
//! acknowledgment), generalized to be transport-agnostic and moved off
//! Discord reactions onto the Transport Adapter's four-method contract.

use std::sync::Arc;

use tracing::{debug, warn};

use duet_core::config::GatingConfig;
use duet_core::types::{ChatId, TriggerKind};
use duet_memory::{is_tapback_reaction, ConversationStore};
use duet_orchestrator::Orchestrator;
use duet_transport::{InboundEvent, Transport};

use crate::heuristic::looks_like_search_query;
use crate::lock::ConversationLocks;

const PREEMPTIVE_ACK_TEXT: &str = "Looking into that…";

pub struct GatingLayer {
    memory: Arc<ConversationStore>,
    transport: Arc<dyn Transport>,
    orchestrator: Arc<Orchestrator>,
    locks: ConversationLocks,
    config: GatingConfig,
}

impl GatingLayer {
    pub fn new(
        memory: Arc<ConversationStore>,
        transport: Arc<dyn Transport>,
        orchestrator: Arc<Orchestrator>,
        config: GatingConfig,
    ) -> Self {
        Self {
            memory,
            transport,
            orchestrator,
            locks: ConversationLocks::new(),
            config,
        }
    }

    /// Record that `text` was just sent to `chat_id` (spec.md §4.1 public
    /// operation, called by the Orchestrator after every `send_text`).
    pub fn record_outbound(&self, chat_id: &ChatId, text: &str) {
        self.memory.record_outbound(chat_id, text);
    }

    /// Handle one raw inbound event (spec.md §4.1 `on_inbound`).
    pub async fn on_inbound(&self, event: InboundEvent) {
        if event.sender_is_self {
            debug!(chat_id = %event.chat_id, "dropping self-authored event");
            return;
        }

        let chat_id = ChatId::from(event.chat_id.clone());
        let _serialization_guard = self.locks.lock(&chat_id).await;

        if self
            .memory
            .is_echo(&chat_id, &event.text, self.config.echo_ttl_seconds)
        {
            debug!(%chat_id, "dropping echoed outbound text");
            return;
        }

        if !self.memory.check_rate_limit(
            &chat_id,
            self.config.rate_window_seconds,
            self.config.rate_max,
        ) {
            warn!(%chat_id, "rate limit exceeded, dropping inbound event");
            return;
        }

        let is_tapback = is_tapback_reaction(&event.text);

        self.memory.push_history(
            &chat_id,
            duet_core::types::Role::User,
            event.text.clone(),
            self.config.history_keep,
        );
        self.memory.record_last_inbound(&chat_id, &event.id, &event.text);

        let mut preacknowledged = false;
        if !is_tapback && looks_like_search_query(&event.text) {
            if let Err(e) = self
                .transport
                .send_text(chat_id.as_str(), PREEMPTIVE_ACK_TEXT, None)
                .await
            {
                warn!(%chat_id, error = %e, "failed to send pre-emptive acknowledgment");
            }
            self.memory.record_outbound(&chat_id, PREEMPTIVE_ACK_TEXT);
            preacknowledged = true;
        }

        self.transport.start_typing(chat_id.as_str()).await;
        let result = self
            .orchestrator
            .run(TriggerKind::User, &event.text, &chat_id, preacknowledged)
            .await;
        self.transport.stop_typing(chat_id.as_str()).await;

        if !result.ok {
            warn!(
                %chat_id,
                error = result.error_text.as_deref().unwrap_or("unknown error"),
                "orchestrator invocation failed"
            );
        }
    }

    /// Handle a Batch Coordinator aggregate payload as a fresh trigger
    /// (spec.md §4.3 `on_batch_complete` callback target).
    pub async fn on_worker_result(&self, chat_id: &ChatId, payload: String) {
        let _serialization_guard = self.locks.lock(chat_id).await;

        self.transport.start_typing(chat_id.as_str()).await;
        let result = self
            .orchestrator
            .run(TriggerKind::WorkerResult, &payload, chat_id, false)
            .await;
        self.transport.stop_typing(chat_id.as_str()).await;

        if !result.ok {
            warn!(
                %chat_id,
                error = result.error_text.as_deref().unwrap_or("unknown error"),
                "orchestrator invocation failed for worker result"
            );
        }
    }
}
