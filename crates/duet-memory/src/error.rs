use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, MemoryError>;
