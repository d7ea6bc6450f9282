use chrono::{DateTime, Utc};

use duet_worker::ExecutionResult;

/// State of one in-flight batch of delegated worker executions for a single
/// conversation (spec.md §3 BatchState).
#[derive(Debug, Clone)]
pub struct BatchState {
    pub batch_id: String,
    pub created_at: DateTime<Utc>,
    pub pending_count: u32,
    pub results: Vec<ExecutionResult>,
}

impl BatchState {
    pub fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            created_at: Utc::now(),
            pending_count: 0,
            results: Vec::new(),
        }
    }
}

/// One registered-but-not-yet-finished delegation (spec.md §3
/// PendingExecution).
#[derive(Debug, Clone)]
pub struct PendingExecution {
    pub request_id: String,
    pub worker_name: String,
    pub instructions: String,
    pub batch_id: String,
    pub created_at: DateTime<Utc>,
}
