use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("LLM provider error: {0}")]
    Llm(#[from] duet_llm::ProviderError),

    #[error("roster error: {0}")]
    Roster(#[from] duet_roster::RosterError),
}

pub type Result<T> = std::result::Result<T, WorkerError>;
