use async_trait::async_trait;
use tracing::info;

use crate::{error::TransportError, transport::Transport, types::ReactionKind};

/// A demo `Transport` that writes to stdout and reads typing balance into
/// `tracing` instead of a real terminal UI. Useful for local smoke tests
/// and for the gateway's terminal-mode entry point.
#[derive(Debug, Default)]
pub struct TerminalTransport;

impl TerminalTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for TerminalTransport {
    fn name(&self) -> &str {
        "terminal"
    }

    async fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        temp_id: Option<&str>,
    ) -> Result<(), TransportError> {
        println!("[{chat_id}] {text}");
        info!(chat_id, ?temp_id, "sent text");
        Ok(())
    }

    async fn send_reaction(
        &self,
        chat_id: &str,
        target_msg_id: &str,
        kind: ReactionKind,
    ) -> Result<(), TransportError> {
        println!("[{chat_id}] reacted {kind} to {target_msg_id}");
        Ok(())
    }

    async fn start_typing(&self, chat_id: &str) {
        info!(chat_id, "typing started");
    }

    async fn stop_typing(&self, chat_id: &str) {
        info!(chat_id, "typing stopped");
    }
}
