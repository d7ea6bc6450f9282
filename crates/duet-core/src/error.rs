use thiserror::Error;

/// Top-level error type for the gateway binary and anything that talks
/// directly to an HTTP/WS client. Subsystem crates (`duet-memory`,
/// `duet-roster`, `duet-batch`, …) define their own narrower errors and are
/// converted into this one only at the boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("transport error ({chat_id}): {reason}")]
    Transport { chat_id: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request timeout after {ms}ms")]
    Timeout { ms: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short error code string sent to clients over HTTP/WS.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Config(_) => "CONFIG_ERROR",
            CoreError::PermissionDenied { .. } => "PERMISSION_DENIED",
            CoreError::Database(_) => "DATABASE_ERROR",
            CoreError::LlmProvider(_) => "LLM_PROVIDER_ERROR",
            CoreError::Transport { .. } => "TRANSPORT_ERROR",
            CoreError::Serialization(_) => "SERIALIZATION_ERROR",
            CoreError::Io(_) => "IO_ERROR",
            CoreError::Timeout { .. } => "TIMEOUT",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
