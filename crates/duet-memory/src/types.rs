use duet_core::types::ChatId;

/// Raw inbound event handed to the Gating Layer by the Transport Adapter
/// (spec.md §3).
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub chat_id: ChatId,
    pub sender_is_self: bool,
    pub text: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub is_tapback_reaction: bool,
}

/// Per-conversation state: rolling history plus the sliding rate-limit
/// window (spec.md §3 Conversation).
#[derive(Debug, Clone)]
pub struct Conversation {
    pub chat_id: ChatId,
    pub last_inbound_id: Option<String>,
    pub last_inbound_text: Option<String>,
    pub history: std::collections::VecDeque<duet_core::types::ConversationTurn>,
    /// Timestamps of inbound events accepted within the current rate window,
    /// oldest first.
    pub(crate) rate_window: std::collections::VecDeque<chrono::DateTime<chrono::Utc>>,
}

impl Conversation {
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            last_inbound_id: None,
            last_inbound_text: None,
            history: std::collections::VecDeque::new(),
            rate_window: std::collections::VecDeque::new(),
        }
    }

    /// Append a turn, capping the rolling history at `keep` most recent
    /// entries (spec.md §4.1 step 6).
    pub fn push_history(&mut self, turn: duet_core::types::ConversationTurn, keep: usize) {
        self.history.push_back(turn);
        while self.history.len() > keep {
            self.history.pop_front();
        }
    }
}
