use serde::{Deserialize, Serialize};

/// One entry in a Worker's append-only history (spec.md §3 HistoryEntry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub worker_name: String,
    pub kind: HistoryEntryKind,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Opaque key/value bag — carries `{tool_name, arguments}` for `Action`
    /// entries.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryEntryKind {
    Request,
    Action,
    ToolResponse,
    Response,
}

impl std::fmt::Display for HistoryEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HistoryEntryKind::Request => "request",
            HistoryEntryKind::Action => "action",
            HistoryEntryKind::ToolResponse => "tool_response",
            HistoryEntryKind::Response => "response",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for HistoryEntryKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(Self::Request),
            "action" => Ok(Self::Action),
            "tool_response" => Ok(Self::ToolResponse),
            "response" => Ok(Self::Response),
            other => Err(format!("unknown history entry kind: {other}")),
        }
    }
}

/// `{name (stable, case-sensitive string), history}` (spec.md §3 Worker).
#[derive(Debug, Clone)]
pub struct Worker {
    pub name: String,
    pub history: Vec<HistoryEntry>,
}

impl Worker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            history: Vec::new(),
        }
    }
}
