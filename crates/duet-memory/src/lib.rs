//! Conversation state for the Gating Layer: rolling history, the
//! OutboundEcho cache, tapback classification, and rate limiting
//! (spec.md §3, §4.1).

pub mod echo;
pub mod error;
pub mod manager;
pub mod rate;
pub mod tapback;
pub mod types;

pub use error::{MemoryError, Result};
pub use manager::ConversationStore;
pub use tapback::is_tapback_reaction;
pub use types::{Conversation, InboundMessage};
