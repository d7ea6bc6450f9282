//! Demo `Transport` for the HTTP `/chat` surface — buffers outbound text per
//! chat so the handler can drain it back into the response body, the same
//! mailbox shape as the teacher's `notifications: DashMap<String, Vec<String>>`
//! queue, generalized from session keys to chat ids and from a drain-poll
//! endpoint to an inline drain after one Gating Layer dispatch.

use async_trait::async_trait;
use dashmap::DashMap;

use duet_transport::{ReactionKind, Transport, TransportError};

#[derive(Default)]
pub struct QueueTransport {
    outbound: DashMap<String, Vec<String>>,
}

impl QueueTransport {
    pub fn new() -> Self {
        Self {
            outbound: DashMap::new(),
        }
    }

    /// Remove and return everything queued for `chat_id` so far.
    pub fn drain(&self, chat_id: &str) -> Vec<String> {
        self.outbound.remove(chat_id).map(|(_, v)| v).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for QueueTransport {
    fn name(&self) -> &str {
        "http-queue"
    }

    async fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        _temp_id: Option<&str>,
    ) -> Result<(), TransportError> {
        self.outbound
            .entry(chat_id.to_string())
            .or_default()
            .push(text.to_string());
        Ok(())
    }

    async fn send_reaction(
        &self,
        chat_id: &str,
        target_msg_id: &str,
        kind: ReactionKind,
    ) -> Result<(), TransportError> {
        self.outbound
            .entry(chat_id.to_string())
            .or_default()
            .push(format!("[reacted {kind} to {target_msg_id}]"));
        Ok(())
    }

    async fn start_typing(&self, _chat_id: &str) {}
    async fn stop_typing(&self, _chat_id: &str) {}
}
