//! Reminder delivery types — shared between the scheduler engine and the
//! `reminder` tool's delivery path (spec.md §9 Design Notes, supplemented
//! scheduling feature).

use serde::{Deserialize, Serialize};

use crate::types::ChatId;

/// Stored as a JSON string in the scheduler's `jobs.action` column. Created
/// by the `reminder` tool when a worker asks for a future delivery; parsed
/// by the delivery router when the scheduler fires the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderAction {
    /// Conversation to deliver into when the job fires.
    pub chat_id: ChatId,
    /// Text to deliver.
    pub message: String,
}

/// Parsed and ready-to-send reminder, passed from the delivery router to the
/// Transport Adapter's `send_text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderDelivery {
    /// Originating job ID — used for logging.
    pub job_id: String,
    pub chat_id: ChatId,
    pub message: String,
}
