//! Pre-emptive acknowledgment heuristic (spec.md §4.1 step 7, §9 Open
//! Question). Deliberately a small, easily-replaceable pattern list — the
//! spec treats the exact set as tuning, not contract.

const WH_PREFIXES: &[&str] = &[
    "who", "what", "when", "where", "why", "how", "which",
    "can you", "could you", "would you", "is there", "are there", "do you know",
];

/// Whether `text` looks enough like a search query that a pre-emptive
/// acknowledgment is worth sending before the Orchestrator even runs.
pub fn looks_like_search_query(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.ends_with('?') {
        return true;
    }
    let lower = trimmed.to_lowercase();
    WH_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_question_mark_matches() {
        assert!(looks_like_search_query("the weather tomorrow?"));
    }

    #[test]
    fn wh_prefix_matches_case_insensitively() {
        assert!(looks_like_search_query("What is the capital of France"));
        assert!(looks_like_search_query("could you check the score"));
    }

    #[test]
    fn plain_statement_does_not_match() {
        assert!(!looks_like_search_query("thanks, that's great"));
    }

    #[test]
    fn empty_text_does_not_match() {
        assert!(!looks_like_search_query("   "));
    }
}
