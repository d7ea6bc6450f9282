use std::sync::Mutex;

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use duet_core::types::{ChatId, ConversationTurn, Role};

use crate::echo::OutboundEcho;
use crate::types::Conversation;

/// Per-process store of every Conversation and its OutboundEcho cache
/// (spec.md §3). Conversations live for the process lifetime; there is no
/// persistence layer here — durability of the orchestration loop's own
/// outputs belongs to the Log Store (`duet-roster`), not to this in-memory
/// gating state.
pub struct ConversationStore {
    conversations: DashMap<ChatId, Mutex<Conversation>>,
    echoes: DashMap<ChatId, Mutex<OutboundEcho>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: DashMap::new(),
            echoes: DashMap::new(),
        }
    }

    /// Whether `text` matches a recent outbound send for `chat_id`.
    pub fn is_echo(&self, chat_id: &ChatId, text: &str, ttl_seconds: u64) -> bool {
        match self.echoes.get(chat_id) {
            Some(entry) => entry
                .lock()
                .unwrap()
                .is_echo(text, Utc::now(), ttl_seconds as i64),
            None => false,
        }
    }

    /// Record that `text` was just sent to `chat_id` (called after every
    /// `send_text`, spec.md §4.1 `record_outbound`).
    pub fn record_outbound(&self, chat_id: &ChatId, text: &str) {
        self.echoes
            .entry(chat_id.clone())
            .or_default()
            .lock()
            .unwrap()
            .record(text, Utc::now());
    }

    /// Accept or reject an inbound event against the sliding rate window,
    /// creating the Conversation on first reference.
    pub fn check_rate_limit(
        &self,
        chat_id: &ChatId,
        window_seconds: u64,
        max_count: u32,
    ) -> bool {
        let conv = self
            .conversations
            .entry(chat_id.clone())
            .or_insert_with(|| Mutex::new(Conversation::new(chat_id.clone())));
        let mut conv = conv.lock().unwrap();
        let accepted = crate::rate::record_and_check(
            &mut conv.rate_window,
            Utc::now(),
            window_seconds as i64,
            max_count,
        );
        if !accepted {
            debug!(%chat_id, "rate limit exceeded, dropping inbound event");
        }
        accepted
    }

    /// Append a turn to the conversation's rolling history, capped at
    /// `keep` most recent entries (spec.md §4.1 step 6).
    pub fn push_history(&self, chat_id: &ChatId, role: Role, content: String, keep: usize) {
        let conv = self
            .conversations
            .entry(chat_id.clone())
            .or_insert_with(|| Mutex::new(Conversation::new(chat_id.clone())));
        conv.lock()
            .unwrap()
            .push_history(ConversationTurn { role, content }, keep);
    }

    /// Snapshot of a conversation's current rolling history, oldest first.
    pub fn history_snapshot(&self, chat_id: &ChatId) -> Vec<ConversationTurn> {
        match self.conversations.get(chat_id) {
            Some(conv) => conv.lock().unwrap().history.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Record the most recent inbound message id/text for reaction targeting.
    pub fn record_last_inbound(&self, chat_id: &ChatId, id: &str, text: &str) {
        let conv = self
            .conversations
            .entry(chat_id.clone())
            .or_insert_with(|| Mutex::new(Conversation::new(chat_id.clone())));
        let mut conv = conv.lock().unwrap();
        conv.last_inbound_id = Some(id.to_string());
        conv.last_inbound_text = Some(text.to_string());
    }

    /// The id of the most recent inbound message for `chat_id`, if any
    /// (used by the Orchestrator's `react` tool to pick a reaction target).
    pub fn last_inbound_id(&self, chat_id: &ChatId) -> Option<String> {
        self.conversations
            .get(chat_id)
            .and_then(|conv| conv.lock().unwrap().last_inbound_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_suppresses_matching_recent_outbound() {
        let store = ConversationStore::new();
        let chat = ChatId::from("c1");
        store.record_outbound(&chat, "hello there");
        assert!(store.is_echo(&chat, "  Hello   There  ", 10));
    }

    #[test]
    fn rate_limit_rejects_after_max() {
        let store = ConversationStore::new();
        let chat = ChatId::from("c2");
        for _ in 0..8 {
            assert!(store.check_rate_limit(&chat, 60, 8));
        }
        assert!(!store.check_rate_limit(&chat, 60, 8));
    }

    #[test]
    fn last_inbound_id_tracks_most_recent_record() {
        let store = ConversationStore::new();
        let chat = ChatId::from("c4");
        assert_eq!(store.last_inbound_id(&chat), None);
        store.record_last_inbound(&chat, "msg-1", "hello");
        assert_eq!(store.last_inbound_id(&chat), Some("msg-1".to_string()));
    }

    #[test]
    fn history_capped_at_keep() {
        let store = ConversationStore::new();
        let chat = ChatId::from("c3");
        for i in 0..25 {
            store.push_history(&chat, Role::User, format!("msg {i}"), 20);
        }
        assert_eq!(store.history_snapshot(&chat).len(), 20);
    }
}
