use thiserror::Error;

/// Errors a transport adapter can surface. `start_typing`/`stop_typing`
/// failures are best-effort (spec.md §6) and are logged rather than
/// propagated through this type.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
