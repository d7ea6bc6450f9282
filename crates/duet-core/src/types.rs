use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque chat identifier handed to us by the transport. We never parse it —
/// it's whatever the transport's own addressing scheme produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub String);

impl ChatId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChatId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Tapback / reaction kinds the Transport Adapter understands (spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Love,
    Like,
    Dislike,
    Laugh,
    Emphasize,
    Question,
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReactionKind::Love => "love",
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
            ReactionKind::Laugh => "laugh",
            ReactionKind::Emphasize => "emphasize",
            ReactionKind::Question => "question",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "love" => Ok(ReactionKind::Love),
            "like" => Ok(ReactionKind::Like),
            "dislike" => Ok(ReactionKind::Dislike),
            "laugh" => Ok(ReactionKind::Laugh),
            "emphasize" => Ok(ReactionKind::Emphasize),
            "question" => Ok(ReactionKind::Question),
            other => Err(format!("unknown reaction kind: {other}")),
        }
    }
}

/// What triggered an Interaction Orchestrator invocation (spec.md §4.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerKind {
    /// A new inbound user message passed the Gating Layer.
    User,
    /// A Batch Coordinator finished aggregating worker results.
    WorkerResult,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerKind::User => write!(f, "user"),
            TriggerKind::WorkerResult => write!(f, "worker_result"),
        }
    }
}

/// A single turn in a conversation's rolling history (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}
