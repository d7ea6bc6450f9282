use serde::{Deserialize, Serialize};

/// Raw inbound event as delivered by a transport adapter (spec.md §6
/// Transport Adapter contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub id: String,
    pub chat_id: String,
    pub sender_is_self: bool,
    pub text: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub sender_address: Option<String>,
    pub reply_target_id: Option<String>,
}

/// Reaction kinds a Transport Adapter can attach to a prior message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Love,
    Like,
    Dislike,
    Laugh,
    Emphasize,
    Question,
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
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
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "love" => Ok(Self::Love),
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            "laugh" => Ok(Self::Laugh),
            "emphasize" => Ok(Self::Emphasize),
            "question" => Ok(Self::Question),
            other => Err(format!("unknown reaction kind: {other}")),
        }
    }
}
