//! Tool Registry: lookup by name, returns a tool's schema, required
//! permission, and `execute(input, ctx) -> {ok, data|err}` (spec.md §2
//! Tool Registry, §4.4 per-worker permission model).

pub mod permissions;
pub mod reminder;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use duet_llm::ToolDefinition;
pub use permissions::{ExecutionContext, PermissionLevel};

/// Result of executing a tool, as folded into a synthetic tool-result
/// content block for the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }

    /// First `limit` characters of `content`, for use in a short "Result:
    /// <short>" Action history entry (spec.md §4.4).
    pub fn short(&self, limit: usize) -> String {
        if self.content.chars().count() <= limit {
            self.content.clone()
        } else {
            self.content.chars().take(limit).collect::<String>() + "…"
        }
    }
}

/// A Tool is `{name, schema, required_permission, execute}` — a capability
/// record, not a class in an inheritance hierarchy.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> serde_json::Value;
    fn required_permission(&self) -> PermissionLevel;
    async fn execute(&self, input: serde_json::Value) -> ToolResult;
}

/// Lookup by name for the Interaction Orchestrator and Worker Runtime.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Invoke `name` with `input`, checking `ctx`'s permission level first.
    /// If the context lacks permission, a failure result is synthesized
    /// without calling the tool (spec.md §4.4).
    pub async fn invoke(
        &self,
        name: &str,
        input: serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ToolResult {
        let Some(tool) = self.get(name) else {
            return ToolResult::error(format!("unknown tool: {name}"));
        };

        if !ctx.permits(tool.required_permission()) {
            return ToolResult::error(format!(
                "permission denied: '{name}' requires {} but caller has {}",
                tool.required_permission(),
                ctx.caller_level
            ));
        }

        tool.execute(input).await
    }

    pub fn to_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes its input back"
        }
        fn input_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        fn required_permission(&self) -> PermissionLevel {
            PermissionLevel::Admin
        }
        async fn execute(&self, input: serde_json::Value) -> ToolResult {
            ToolResult::success(input.to_string())
        }
    }

    #[tokio::test]
    async fn invoke_denies_insufficient_permission() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let ctx = ExecutionContext::new(PermissionLevel::User);
        let result = registry.invoke("echo", serde_json::json!({}), &ctx).await;
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn invoke_runs_tool_when_permitted() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let ctx = ExecutionContext::new(PermissionLevel::Admin);
        let result = registry
            .invoke("echo", serde_json::json!({"x": 1}), &ctx)
            .await;
        assert!(!result.is_error);
    }

    #[test]
    fn tool_result_short_truncates_with_ellipsis() {
        let result = ToolResult::success("a".repeat(300));
        assert_eq!(result.short(10).chars().count(), 11);
    }
}
