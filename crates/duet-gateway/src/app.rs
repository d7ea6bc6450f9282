use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use duet_core::config::Config;
use duet_gating::GatingLayer;

use crate::queue_transport::QueueTransport;

/// Central shared state — passed as `Arc<AppState>` to all Axum handlers.
pub struct AppState {
    pub config: Config,
    pub gating: Arc<GatingLayer>,
    pub transport: Arc<QueueTransport>,
}

/// Assemble the full Axum router (spec.md §6: the demo gateway exposes a
/// liveness probe and a terminal-style chat endpoint, nothing more).
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/chat", post(crate::http::chat::chat_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
