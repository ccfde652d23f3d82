//! Route assembly.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

pub mod api;

/// Full application router: the unversioned liveness probe plus the
/// versioned API.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(health::status))
        .merge(api::create_api_router())
}
