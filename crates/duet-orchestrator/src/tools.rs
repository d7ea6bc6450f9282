//! Fixed interaction-tool surface exposed to the model (spec.md §4.2). These
//! are interpreted directly by the loop, not looked up in a
//! `duet_tools::ToolRegistry` — the Orchestrator's four tools are a closed
//! set, unlike a Worker's open-ended one.

use duet_llm::ToolDefinition;

pub fn interaction_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "send_to_user".to_string(),
            description: "Send a message to the user. Separate independent bubbles with \"||\"."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": { "message": { "type": "string" } },
                "required": ["message"],
            }),
        },
        ToolDefinition {
            name: "send_to_worker".to_string(),
            description: "Delegate a task to a named execution worker. Does not block; the \
                result arrives later as a fresh invocation."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "worker_name": { "type": "string" },
                    "instructions": { "type": "string" },
                },
                "required": ["worker_name", "instructions"],
            }),
        },
        ToolDefinition {
            name: "wait".to_string(),
            description: "Do nothing this turn and record why.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": { "reason": { "type": "string" } },
                "required": ["reason"],
            }),
        },
        ToolDefinition {
            name: "react".to_string(),
            description: "Attach a tapback reaction to the user's most recent message."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "reaction": {
                        "type": "string",
                        "enum": ["love", "like", "dislike", "laugh", "emphasize", "question"],
                    },
                },
                "required": ["reaction"],
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_exactly_the_four_interaction_tools() {
        let names: Vec<&str> = interaction_tool_definitions()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["send_to_user", "send_to_worker", "wait", "react"]);
    }
}
