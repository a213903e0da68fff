//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response: status, module name, version and data state
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// "ok" or "degraded" (a required data file failed to load)
    pub data: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.snapshot().await;
    let data = if snapshot.outcome.required_failure().is_some() {
        "degraded"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "gijie-site".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: data.to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
