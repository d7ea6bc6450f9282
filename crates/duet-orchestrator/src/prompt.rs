//! Structured first-iteration prompt assembly (spec.md §4.2).

use duet_core::types::{ConversationTurn, Role, TriggerKind};

/// Conversation turns folded into `<conversation_history>` (last N, oldest
/// first).
const HISTORY_RENDER_COUNT: usize = 10;

pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Build the tagged-section prompt string for the first loop iteration.
/// Any section is omitted entirely when it would be empty.
pub fn build_structured_prompt(
    history: &[ConversationTurn],
    active_agents: u32,
    trigger_kind: &TriggerKind,
    payload: &str,
) -> String {
    let mut sections = Vec::new();

    let recent: Vec<&ConversationTurn> = history
        .iter()
        .rev()
        .take(HISTORY_RENDER_COUNT)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if !recent.is_empty() {
        let mut block = String::from("<conversation_history>\n");
        for turn in recent {
            let tag = match turn.role {
                Role::User => "user_message",
                Role::Assistant => "assistant_message",
            };
            block.push_str(&format!("<{tag}>{}</{tag}>\n", xml_escape(&turn.content)));
        }
        block.push_str("</conversation_history>");
        sections.push(block);
    }

    if active_agents > 0 {
        sections.push(format!("<active_agents>{active_agents}</active_agents>"));
    }

    let payload_tag = match trigger_kind {
        TriggerKind::User => "new_user_message",
        TriggerKind::WorkerResult => "new_agent_message",
    };
    sections.push(format!(
        "<{payload_tag}>{}</{payload_tag}>",
        xml_escape(payload)
    ));

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_escape_covers_the_three_special_characters() {
        assert_eq!(xml_escape("a & b < c > d"), "a &amp; b &lt; c &gt; d");
    }

    #[test]
    fn omits_history_and_active_agents_when_absent() {
        let prompt = build_structured_prompt(&[], 0, &TriggerKind::User, "hi");
        assert_eq!(prompt, "<new_user_message>hi</new_user_message>");
    }

    #[test]
    fn includes_history_and_active_agents_when_present() {
        let history = vec![
            ConversationTurn {
                role: Role::User,
                content: "hello".to_string(),
            },
            ConversationTurn {
                role: Role::Assistant,
                content: "hi there".to_string(),
            },
        ];
        let prompt = build_structured_prompt(&history, 2, &TriggerKind::WorkerResult, "done");
        assert!(prompt.contains("<user_message>hello</user_message>"));
        assert!(prompt.contains("<assistant_message>hi there</assistant_message>"));
        assert!(prompt.contains("<active_agents>2</active_agents>"));
        assert!(prompt.ends_with("<new_agent_message>done</new_agent_message>"));
    }

    #[test]
    fn keeps_only_the_most_recent_entries() {
        let history: Vec<ConversationTurn> = (0..15)
            .map(|i| ConversationTurn {
                role: Role::User,
                content: format!("msg {i}"),
            })
            .collect();
        let prompt = build_structured_prompt(&history, 0, &TriggerKind::User, "now");
        assert!(!prompt.contains("msg 4<"));
        assert!(prompt.contains("msg 5"));
        assert!(prompt.contains("msg 14"));
    }
}
