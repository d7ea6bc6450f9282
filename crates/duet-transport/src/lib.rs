pub mod error;
pub mod manager;
pub mod terminal;
pub mod transport;
pub mod types;

pub use error::{Result, TransportError};
pub use manager::TransportRegistry;
pub use terminal::TerminalTransport;
pub use transport::Transport;
pub use types::{InboundEvent, ReactionKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn terminal_transport_reports_its_name() {
        let t = TerminalTransport::new();
        assert_eq!(t.name(), "terminal");
        assert!(t.send_text("c1", "hi", None).await.is_ok());
    }

    #[test]
    fn reaction_kind_roundtrips_through_str() {
        for kind in [
            ReactionKind::Love,
            ReactionKind::Like,
            ReactionKind::Dislike,
            ReactionKind::Laugh,
            ReactionKind::Emphasize,
            ReactionKind::Question,
        ] {
            let s = kind.to_string();
            assert_eq!(s.parse::<ReactionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn registry_returns_registered_transport_by_name() {
        use std::sync::Arc;
        let mut registry = TransportRegistry::new();
        registry.register(Arc::new(TerminalTransport::new()));
        assert!(registry.get("terminal").is_some());
        assert!(registry.get("missing").is_none());
    }
}
