use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("worker runtime error: {0}")]
    Worker(#[from] duet_worker::WorkerError),
}

pub type Result<T> = std::result::Result<T, BatchError>;
