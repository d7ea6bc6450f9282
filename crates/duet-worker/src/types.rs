use serde::{Deserialize, Serialize};

/// Outcome of one `WorkerRuntime::execute` call (spec.md §3 ExecutionResult).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub worker_name: String,
    pub ok: bool,
    pub response_text: String,
    pub tools_used: Vec<String>,
    pub iteration_count: usize,
    pub error_text: Option<String>,
}

impl ExecutionResult {
    pub fn success(worker_name: impl Into<String>, response_text: String, tools_used: Vec<String>, iteration_count: usize) -> Self {
        Self {
            worker_name: worker_name.into(),
            ok: true,
            response_text,
            tools_used,
            iteration_count,
            error_text: None,
        }
    }

    pub fn failure(worker_name: impl Into<String>, error_text: impl Into<String>, tools_used: Vec<String>, iteration_count: usize) -> Self {
        Self {
            worker_name: worker_name.into(),
            ok: false,
            response_text: String::new(),
            tools_used,
            iteration_count,
            error_text: Some(error_text.into()),
        }
    }
}
