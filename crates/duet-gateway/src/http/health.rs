use axum::{extract::State, Json};
use std::sync::Arc;

use duet_protocol::HealthFrame;

use crate::app::AppState;

/// `GET /health` — liveness probe.
pub async fn health_handler(State(_state): State<Arc<AppState>>) -> Json<HealthFrame> {
    Json(HealthFrame::ok(env!("CARGO_PKG_VERSION")))
}
