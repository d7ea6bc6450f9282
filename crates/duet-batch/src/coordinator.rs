//! Execution Batch Coordinator (spec.md §4.3) — tracks in-flight Worker
//! executions for one conversation, races each against a timeout, and
//! once the last one completes, produces a single aggregate payload fed
//! back to the Orchestrator as a fresh trigger.
//!
//! Grounded on `SchedulerHandle`'s `Arc<Mutex<...>>` shared-handle shape
//! (a single lock guarding all mutable state reachable from multiple
//! concurrent callers) and the other_examples `ToolCoordinator`'s
//! join-then-timeout pattern over concurrent units of work.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use duet_tools::ExecutionContext;
use duet_worker::{ExecutionResult, WorkerRuntime};

use crate::types::{BatchState, PendingExecution};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 90;

type OnBatchComplete = Box<dyn Fn(String) + Send + Sync>;

struct Inner {
    batch: Option<BatchState>,
    pending: HashMap<String, PendingExecution>,
}

/// Tracks one conversation's in-flight worker delegations. BatchState and
/// the pending map live behind a single mutex so concurrent
/// `execute_worker` completions serialize against each other (spec.md §5
/// shared mutable state requirement).
pub struct BatchCoordinator {
    worker_runtime: Arc<WorkerRuntime>,
    inner: Mutex<Inner>,
    on_batch_complete: Mutex<Option<OnBatchComplete>>,
    timeout_seconds: u64,
}

impl BatchCoordinator {
    pub fn new(worker_runtime: Arc<WorkerRuntime>) -> Self {
        Self {
            worker_runtime,
            inner: Mutex::new(Inner {
                batch: None,
                pending: HashMap::new(),
            }),
            on_batch_complete: Mutex::new(None),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    pub fn with_timeout_seconds(mut self, secs: u64) -> Self {
        self.timeout_seconds = secs;
        self
    }

    pub fn set_on_batch_complete<F>(&self, callback: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        *self.on_batch_complete.lock().unwrap() = Some(Box::new(callback));
    }

    pub fn pending_count(&self) -> u32 {
        self.inner
            .lock()
            .unwrap()
            .batch
            .as_ref()
            .map(|b| b.pending_count)
            .unwrap_or(0)
    }

    /// Run `worker_name` with `instructions`, blocking the caller until it
    /// finishes, times out, or errors. Registers the delegation in the
    /// current (or a freshly minted) batch; when this is the last
    /// outstanding execution in the batch, invokes the on-batch-complete
    /// callback with the formatted aggregate payload.
    pub async fn execute_worker(
        &self,
        worker_name: &str,
        instructions: &str,
        request_id: Option<String>,
        ctx: &ExecutionContext,
    ) -> ExecutionResult {
        let request_id = request_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let batch_id = self.register_pending(&request_id, worker_name, instructions);

        let result = match timeout(
            Duration::from_secs(self.timeout_seconds),
            self.worker_runtime.execute(worker_name, instructions, ctx),
        )
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(worker = worker_name, error = %e, "worker runtime errored");
                ExecutionResult::failure(worker_name, e.to_string(), Vec::new(), 0)
            }
            Err(_) => {
                warn!(worker = worker_name, timeout_seconds = self.timeout_seconds, "worker execution timed out");
                ExecutionResult::failure(
                    worker_name,
                    format!("Execution timed out after {} seconds", self.timeout_seconds),
                    Vec::new(),
                    0,
                )
            }
        };

        self.complete_pending(&request_id, batch_id, result.clone());
        result
    }

    fn register_pending(&self, request_id: &str, worker_name: &str, instructions: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        if inner.batch.is_none() {
            inner.batch = Some(BatchState::new(Uuid::new_v4().to_string()));
        }
        let batch_id = inner.batch.as_ref().unwrap().batch_id.clone();
        let batch = inner.batch.as_mut().unwrap();
        batch.pending_count += 1;
        inner.pending.insert(
            request_id.to_string(),
            PendingExecution {
                request_id: request_id.to_string(),
                worker_name: worker_name.to_string(),
                instructions: instructions.to_string(),
                batch_id: batch_id.clone(),
                created_at: chrono::Utc::now(),
            },
        );
        batch_id
    }

    fn complete_pending(&self, request_id: &str, batch_id: String, result: ExecutionResult) {
        let finished_batch = {
            let mut inner = self.inner.lock().unwrap();
            inner.pending.remove(request_id);

            let Some(batch) = inner.batch.as_mut() else {
                warn!(%batch_id, "batch already cleared when completing pending execution");
                return;
            };
            batch.results.push(result);
            batch.pending_count = batch.pending_count.saturating_sub(1);

            if batch.pending_count == 0 {
                inner.batch.take()
            } else {
                None
            }
        };

        if let Some(batch) = finished_batch {
            let payload = format_aggregate_payload(&batch.results);
            info!(batch_id = %batch.batch_id, results = batch.results.len(), "batch complete");
            if let Some(callback) = self.on_batch_complete.lock().unwrap().as_ref() {
                callback(payload);
            }
        }
    }
}

/// `[SUCCESS|FAILED] <worker_name>[ (tools: t1, t2, …)]: <response_text>`
/// lines, separated by a blank line (spec.md §4.3 aggregate payload
/// format).
fn format_aggregate_payload(results: &[ExecutionResult]) -> String {
    results
        .iter()
        .map(|r| {
            let status = if r.ok { "SUCCESS" } else { "FAILED" };
            let tools = if r.tools_used.is_empty() {
                String::new()
            } else {
                format!(" (tools: {})", r.tools_used.join(", "))
            };
            let text = if r.ok {
                r.response_text.as_str()
            } else {
                r.error_text.as_deref().unwrap_or("unknown error")
            };
            format!("[{status}] {}{tools}: {text}", r.worker_name)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, ok: bool, text: &str, tools: Vec<&str>) -> ExecutionResult {
        if ok {
            ExecutionResult::success(
                name,
                text.to_string(),
                tools.into_iter().map(String::from).collect(),
                1,
            )
        } else {
            ExecutionResult::failure(
                name,
                text.to_string(),
                tools.into_iter().map(String::from).collect(),
                1,
            )
        }
    }

    #[test]
    fn aggregate_payload_formats_success_and_failure_lines() {
        let results = vec![
            result("alpha", true, "done", vec!["reminder"]),
            result("beta", false, "Execution timed out after 90 seconds", vec![]),
        ];
        let payload = format_aggregate_payload(&results);
        assert_eq!(
            payload,
            "[SUCCESS] alpha (tools: reminder): done\n\n[FAILED] beta: Execution timed out after 90 seconds"
        );
    }
}
