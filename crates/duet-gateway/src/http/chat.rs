//! Terminal-style chat endpoint — `POST /chat`.
//!
//! Feeds one inbound message through the Conversation Gating Layer and
//! returns whatever text the Gating Layer's Transport Adapter collected for
//! that chat during the dispatch. A delegated `send_to_worker` call may
//! still be in flight when this response goes out — its result arrives on
//! a later `/chat` call for the same `session_id`, per spec.md §4.2 step 4.
//!
//! Request:  `{"message": "hello", "session_id": "default"}`
//! Response: `{"reply": "..."}`

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use duet_transport::InboundEvent;

use crate::app::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Serialize)]
pub struct ChatError {
    pub error: String,
}

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ChatError>)> {
    if req.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ChatError {
                error: "message cannot be empty".to_string(),
            }),
        ));
    }

    let chat_id = req.session_id.as_deref().unwrap_or("default").to_string();
    let event = InboundEvent {
        id: uuid::Uuid::new_v4().to_string(),
        chat_id: chat_id.clone(),
        sender_is_self: false,
        text: req.message,
        timestamp: chrono::Utc::now(),
        sender_address: None,
        reply_target_id: None,
    };

    state.gating.on_inbound(event).await;

    let reply = state.transport.drain(&chat_id).join("\n");
    Ok(Json(ChatReply { reply }))
}
