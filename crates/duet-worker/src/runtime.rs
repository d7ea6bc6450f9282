//! Worker Runtime — one bounded LLM tool-use loop per delegated task
//! (spec.md §4.4), grounded on the shape of a provider tool loop
//! (call LLM → inspect tool calls → execute → feed results back → repeat)
//! with the worker's own persistent history substituting for the
//! teacher's SQLite conversation log.

use std::sync::Arc;

use tracing::{debug, info, warn};

use duet_llm::{ChatRequest, LlmClient, Message, Role};
use duet_roster::{HistoryEntryKind, WorkerRoster};
use duet_tools::{ExecutionContext, ToolRegistry};

use crate::error::Result;
use crate::types::ExecutionResult;

/// Tool-use iterations are capped the same way for both the Orchestrator
/// and every Worker Runtime (spec.md §6 config table).
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 8;

/// Most recent history entries folded into a worker's system prompt.
const HISTORY_RENDER_COUNT: usize = 10;

/// Characters of each rendered history entry kept in the prompt.
const HISTORY_ENTRY_CHARS: usize = 200;

const BASE_SYSTEM_PROMPT: &str = "You are an execution worker carrying out one delegated task. \
Use the tools available to you as needed, then reply with a final plain-text answer. \
Do not ask the user clarifying questions — make a reasonable assumption and proceed.";

pub struct WorkerRuntime {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    roster: Arc<WorkerRoster>,
    model: String,
    max_output_tokens: u32,
    max_tool_iterations: usize,
}

impl WorkerRuntime {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        roster: Arc<WorkerRoster>,
        model: String,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            llm,
            tools,
            roster,
            model,
            max_output_tokens,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }

    /// Run the worker's bounded tool-use loop for one delegated task.
    pub async fn execute(
        &self,
        worker_name: &str,
        instructions: &str,
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult> {
        let (worker, is_new) = self.roster.get_or_create(worker_name)?;
        debug!(worker = worker_name, is_new, "worker runtime starting");

        self.roster.record_entry(
            worker_name,
            HistoryEntryKind::Request,
            instructions,
            serde_json::json!({}),
        )?;

        let system = build_system_prompt(&worker.history);
        let mut messages = vec![Message {
            role: Role::User,
            content: instructions.to_string(),
        }];

        let mut tools_used = Vec::new();

        for iteration in 1..=self.max_tool_iterations {
            let request = ChatRequest {
                model: self.model.clone(),
                system: system.clone(),
                messages: messages.clone(),
                tools: self.tools.to_definitions(),
                max_output_tokens: self.max_output_tokens,
                chat_id: None,
            };

            let response = self.llm.complete(&request).await?;

            if !response.has_tool_use() {
                let text = join_text_blocks(&response);
                self.roster.record_entry(
                    worker_name,
                    HistoryEntryKind::Response,
                    &text,
                    serde_json::json!({ "tools_used": tools_used }),
                )?;
                info!(worker = worker_name, iteration, "worker runtime finished");
                return Ok(ExecutionResult::success(
                    worker_name,
                    text,
                    tools_used,
                    iteration,
                ));
            }

            let mut assistant_turn = response.text();
            let mut tool_result_turn = String::new();

            for (id, name, input) in response.tool_uses() {
                let result = self.tools.invoke(name, input.clone(), ctx).await;
                tools_used.push(name.to_string());

                let short = result.short(200);
                let action_content =
                    format!("Tool: {name}, Args: {input}, Result: {short}");
                self.roster.record_entry(
                    worker_name,
                    HistoryEntryKind::Action,
                    &action_content,
                    serde_json::json!({ "tool_name": name, "tool_use_id": id }),
                )?;

                assistant_turn.push_str(&format!("\n[calling tool {name} with {input}]"));
                tool_result_turn.push_str(&format!(
                    "[result of {name}] {}\n",
                    result.content
                ));
            }

            messages.push(Message {
                role: Role::Assistant,
                content: assistant_turn,
            });
            messages.push(Message {
                role: Role::User,
                content: tool_result_turn,
            });
        }

        warn!(
            worker = worker_name,
            max_iterations = self.max_tool_iterations,
            "worker runtime hit max iterations"
        );
        self.roster.record_entry(
            worker_name,
            HistoryEntryKind::Response,
            "max iterations reached",
            serde_json::json!({ "tools_used": tools_used }),
        )?;
        Ok(ExecutionResult::failure(
            worker_name,
            "max iterations reached",
            tools_used,
            self.max_tool_iterations,
        ))
    }
}

/// Join every text block with a newline (spec.md §4.4 step 4b), as opposed
/// to `ChatResponse::text()`'s plain concatenation used elsewhere.
fn join_text_blocks(response: &duet_llm::ChatResponse) -> String {
    response
        .content_blocks
        .iter()
        .filter_map(|b| match b {
            duet_llm::ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `BASE_SYSTEM_PROMPT` followed by the last `HISTORY_RENDER_COUNT` entries
/// of this worker's history, each rendered as
/// `- [TYPE] (ISO-8601 timestamp) <first 200 chars>` (spec.md §4.4 step 2).
fn build_system_prompt(history: &[duet_roster::HistoryEntry]) -> String {
    let mut prompt = BASE_SYSTEM_PROMPT.to_string();

    let recent = history
        .iter()
        .rev()
        .take(HISTORY_RENDER_COUNT)
        .collect::<Vec<_>>();
    if recent.is_empty() {
        return prompt;
    }

    prompt.push_str("\n\n## Recent history\n");
    for entry in recent.into_iter().rev() {
        let truncated: String = entry.content.chars().take(HISTORY_ENTRY_CHARS).collect();
        prompt.push_str(&format!(
            "- [{}] ({}) {}\n",
            entry.kind,
            entry.timestamp.to_rfc3339(),
            truncated
        ));
    }
    prompt
}
