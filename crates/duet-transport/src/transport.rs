use async_trait::async_trait;

use crate::{error::TransportError, types::ReactionKind};

/// The four operations the core needs from a chat transport (spec.md §6
/// Transport Adapter contract). Reconnect, queueing, and wire format are
/// entirely the implementation's concern; the core only ever calls these
/// four methods and assumes at-least-once inbound delivery.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Stable lowercase identifier for this adapter (e.g. `"terminal"`).
    fn name(&self) -> &str;

    /// Deliver `text` to `chat_id`. Idempotent by `(chat_id, temp_id)` when
    /// a caller-supplied temp id is available.
    async fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        temp_id: Option<&str>,
    ) -> Result<(), TransportError>;

    /// Attach `kind` to a prior message.
    async fn send_reaction(
        &self,
        chat_id: &str,
        target_msg_id: &str,
        kind: ReactionKind,
    ) -> Result<(), TransportError>;

    /// Best-effort: show a typing indicator for `chat_id`. Errors should be
    /// logged and swallowed by the implementation rather than propagated.
    async fn start_typing(&self, chat_id: &str);

    /// Best-effort: clear the typing indicator for `chat_id`.
    async fn stop_typing(&self, chat_id: &str);
}
