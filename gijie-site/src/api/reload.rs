//! Data reload endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub generation: u64,
    pub characters: usize,
    /// One message per resource that failed to load
    pub failures: Vec<String>,
    pub pickup: Vec<String>,
}

/// POST /api/reload
///
/// Re-runs the loader. Concurrent requests are serialized; each gets the
/// snapshot its own run produced.
pub async fn reload_data(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ReloadError> {
    let snapshot = state.reload().await.map_err(|e| {
        error!("Reload failed: {}", e);
        ReloadError::Carousel(e.to_string())
    })?;

    Ok(Json(ReloadResponse {
        generation: snapshot.generation,
        characters: snapshot.data().characters.len(),
        failures: snapshot.outcome.failures.iter().map(|f| f.to_string()).collect(),
        pickup: snapshot.pickup.clone(),
    }))
}

#[derive(Debug)]
pub enum ReloadError {
    Carousel(String),
}

impl IntoResponse for ReloadError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ReloadError::Carousel(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Carousel reset failed: {}", msg),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
