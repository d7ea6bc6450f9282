/// Outcome of one Orchestrator invocation (spec.md §4.2 `run`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionResult {
    pub ok: bool,
    pub error_text: Option<String>,
}

impl InteractionResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            error_text: None,
        }
    }

    pub fn failure(error_text: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_text: Some(error_text.into()),
        }
    }
}
