//! Interaction Orchestrator — the bounded per-conversation LLM tool-use loop
//! (spec.md §4.2), grounded on the same call/inspect/execute/continue shape
//! as the Worker Runtime's loop, with its own fixed four-tool surface and
//! the `AckHandle`-derived ack-once-per-trigger rule.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use duet_batch::BatchRegistry;
use duet_core::types::{ChatId, TriggerKind};
use duet_llm::{ChatRequest, ContentBlock, LlmClient, Message, Role};
use duet_memory::ConversationStore;
use duet_tools::{ExecutionContext, PermissionLevel};
use duet_transport::Transport;

use crate::ack::{AckState, ACK_TEXT};
use crate::citation::{split_bubbles, strip_citations};
use crate::prompt::build_structured_prompt;
use crate::tools::interaction_tool_definitions;
use crate::types::InteractionResult;

pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 8;

const BASE_SYSTEM_PROMPT: &str = "You are a conversational assistant. Use send_to_user to reply, \
send_to_worker to delegate a task to a background execution worker, wait when there is nothing \
useful to do yet, and react to tapback a message. Delegated work returns later as a fresh turn; \
do not block waiting for it.";

pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    transport: Arc<dyn Transport>,
    memory: Arc<ConversationStore>,
    batch_registry: Arc<BatchRegistry>,
    model: String,
    max_output_tokens: u32,
    max_tool_iterations: usize,
    delegate_permission: PermissionLevel,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        transport: Arc<dyn Transport>,
        memory: Arc<ConversationStore>,
        batch_registry: Arc<BatchRegistry>,
        model: String,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            llm,
            transport,
            memory,
            batch_registry,
            model,
            max_output_tokens,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
            delegate_permission: PermissionLevel::User,
        }
    }

    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }

    /// Run the bounded loop for one trigger (spec.md §4.2 `run`).
    /// `preacknowledged` is set by the Gating Layer when its pre-emptive ack
    /// heuristic (spec.md §4.1 step 7) already sent a short acknowledgment
    /// before invoking the loop, so this invocation doesn't send a second one.
    pub async fn run(
        &self,
        trigger_kind: TriggerKind,
        payload: &str,
        chat_id: &ChatId,
        preacknowledged: bool,
    ) -> InteractionResult {
        let mut ack = AckState::new();
        if preacknowledged {
            ack.mark_sent();
        }
        let history = self.memory.history_snapshot(chat_id);
        let active_agents = self.batch_registry.get_or_create(chat_id).pending_count();

        let first_message = build_structured_prompt(&history, active_agents, &trigger_kind, payload);
        let mut messages = vec![Message {
            role: Role::User,
            content: first_message,
        }];

        for iteration in 1..=self.max_tool_iterations {
            let request = ChatRequest {
                model: self.model.clone(),
                system: BASE_SYSTEM_PROMPT.to_string(),
                messages: messages.clone(),
                tools: interaction_tool_definitions(),
                max_output_tokens: self.max_output_tokens,
                chat_id: if iteration == 1 { Some(chat_id.clone()) } else { None },
            };

            let response = match self.llm.complete(&request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(%chat_id, error = %e, "orchestrator llm call failed");
                    return InteractionResult::failure(format!("llm error: {e}"));
                }
            };

            let server_tool_used = response
                .content_blocks
                .iter()
                .any(|b| matches!(b, ContentBlock::ServerToolUse { .. }));
            if server_tool_used && !ack.is_sent() {
                self.send_ack(chat_id, &mut ack).await;
            }

            let tool_uses: Vec<(String, String, serde_json::Value)> = response
                .tool_uses()
                .map(|(id, name, input)| (id.to_string(), name.to_string(), input.clone()))
                .collect();

            if tool_uses.is_empty() {
                let text = strip_citations(&response.text());
                for bubble in split_bubbles(&text) {
                    self.send_to_user(chat_id, &bubble).await;
                }
                info!(%chat_id, iteration, "orchestrator reached terminal text response");
                return InteractionResult::success();
            }

            let assistant_turn = response.text();
            let mut tool_result_turn = String::new();

            for (_id, name, input) in &tool_uses {
                match name.as_str() {
                    "send_to_user" => {
                        let message = input.get("message").and_then(|v| v.as_str()).unwrap_or_default();
                        let cleaned = strip_citations(message);
                        for bubble in split_bubbles(&cleaned) {
                            self.send_to_user(chat_id, &bubble).await;
                        }
                        tool_result_turn.push_str("[send_to_user] sent\n");
                    }
                    "send_to_worker" => {
                        let worker_name = input
                            .get("worker_name")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string();
                        let instructions = input
                            .get("instructions")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string();

                        if !ack.is_sent() {
                            self.send_ack(chat_id, &mut ack).await;
                        }

                        let request_id = Uuid::new_v4().to_string();
                        let batch = self.batch_registry.get_or_create(chat_id);
                        let ctx = ExecutionContext::new(self.delegate_permission);
                        let spawned_worker = worker_name.clone();
                        let spawned_instructions = instructions.clone();
                        let spawned_request_id = request_id.clone();
                        tokio::spawn(async move {
                            batch
                                .execute_worker(&spawned_worker, &spawned_instructions, Some(spawned_request_id), &ctx)
                                .await;
                        });

                        tool_result_turn.push_str(&format!(
                            "[send_to_worker] delegated to {worker_name} (request_id {request_id})\n"
                        ));
                    }
                    "wait" => {
                        let reason = input.get("reason").and_then(|v| v.as_str()).unwrap_or_default();
                        tool_result_turn.push_str(&format!("Waiting: {reason}\n"));
                    }
                    "react" => {
                        tool_result_turn.push_str(&self.handle_react(chat_id, input).await);
                        tool_result_turn.push('\n');
                    }
                    other => {
                        tool_result_turn.push_str(&format!("[unknown tool {other}]\n"));
                    }
                }
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

        warn!(%chat_id, max_iterations = self.max_tool_iterations, "orchestrator hit max iterations");
        InteractionResult::failure("max iterations reached")
    }

    async fn send_to_user(&self, chat_id: &ChatId, text: &str) {
        if let Err(e) = self.transport.send_text(chat_id.as_str(), text, None).await {
            warn!(%chat_id, error = %e, "failed to send outbound text");
        }
        self.memory.record_outbound(chat_id, text);
    }

    async fn send_ack(&self, chat_id: &ChatId, ack: &mut AckState) {
        self.send_to_user(chat_id, ACK_TEXT).await;
        ack.mark_sent();
    }

    async fn handle_react(&self, chat_id: &ChatId, input: &serde_json::Value) -> String {
        let Some(reaction_str) = input.get("reaction").and_then(|v| v.as_str()) else {
            return "[react] missing reaction".to_string();
        };
        let Some(target_id) = self.memory.last_inbound_id(chat_id) else {
            return "[react] no inbound message to react to".to_string();
        };
        match reaction_str.parse::<duet_transport::ReactionKind>() {
            Ok(kind) => {
                if let Err(e) = self.transport.send_reaction(chat_id.as_str(), &target_id, kind).await {
                    warn!(%chat_id, error = %e, "failed to send reaction");
                }
                "[react] sent".to_string()
            }
            Err(_) => format!("[react] unknown reaction kind: {reaction_str}"),
        }
    }
}
