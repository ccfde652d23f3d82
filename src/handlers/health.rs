//! Health and liveness endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: OverallHealth,
    pub service_name: String,
    pub version: String,
    pub services: serde_json::Map<String, serde_json::Value>,
}

/// Aggregated health check across every registered service.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthCheckResponse> {
    let (all_healthy, services) = state.registry.health_report().await;

    Json(HealthCheckResponse {
        status: if all_healthy {
            OverallHealth::Healthy
        } else {
            OverallHealth::Unhealthy
        },
        service_name: state.service_name(),
        version: state.version(),
        services,
    })
}

/// Unauthenticated liveness probe.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": state.service_name(),
    }))
}
