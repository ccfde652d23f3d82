use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, speech, voices};
use crate::state::AppState;

/// Create the versioned API router.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/tts/generate", post(speech::generate_speech))
        .route("/api/v1/voice/clone", post(voices::clone_voice))
        .route(
            "/api/v1/voice/clone-and-generate",
            post(voices::clone_and_generate),
        )
        .route("/api/v1/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
}
