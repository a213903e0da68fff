//! Pickup carousel API and event stream
//!
//! Clients report gestures, dot clicks, visibility and scroll geometry; the
//! driver answers with its new state and pushes `state`, `scroll` and
//! `closed` events over SSE.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use gijie_common::carousel::{CarouselInput, Gesture, ScrollGeometry};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::carousel::{snapshot_within, CarouselError, CarouselEvent, CarouselSnapshot};
use crate::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);
const STATE_TIMEOUT: Duration = Duration::from_secs(2);

/// Build carousel routes
pub fn pickup_routes() -> Router<AppState> {
    Router::new()
        .route("/api/pickup/events", get(pickup_events))
        .route("/api/pickup/state", get(pickup_state))
        .route("/api/pickup/interact", post(pickup_interact))
        .route("/api/pickup/dot/:index", post(pickup_dot))
        .route("/api/pickup/visibility", post(pickup_visibility))
        .route("/api/pickup/scroll", post(pickup_scroll))
        .route("/api/pickup/close", post(pickup_close))
}

/// GET /api/pickup/events
///
/// Sends the current state first, then every driver event. A comment
/// heartbeat goes out every 15 seconds.
pub async fn pickup_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to pickup events");
    let mut rx = state.carousel.subscribe();
    let initial = state.carousel.snapshot().await.ok();

    let stream = async_stream::stream! {
        if let Some(snapshot) = initial {
            if let Some(event) = to_sse(&CarouselEvent::State(snapshot)) {
                yield Ok(event);
            }
        }

        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(event) => {
                        if let Some(sse) = to_sse(&event) {
                            yield Ok(sse);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("SSE client lagged, skipped {} carousel events", skipped);
                    }
                    Err(RecvError::Closed) => {
                        info!("Carousel event channel closed, ending SSE stream");
                        break;
                    }
                },
                _ = tokio::time::sleep(HEARTBEAT_INTERVAL) => {
                    debug!("SSE: Sending heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(HEARTBEAT_INTERVAL).text("heartbeat"))
}

fn to_sse(event: &CarouselEvent) -> Option<Event> {
    match Event::default().event(event.name()).json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            warn!("Failed to encode carousel event: {}", e);
            None
        }
    }
}

/// GET /api/pickup/state
pub async fn pickup_state(
    State(state): State<AppState>,
) -> Result<Json<CarouselSnapshot>, PickupError> {
    Ok(Json(snapshot_within(&state.carousel, STATE_TIMEOUT).await?))
}

/// Gesture report; defaults to a pointer press
#[derive(Debug, Deserialize)]
pub struct InteractRequest {
    #[serde(default = "default_gesture")]
    pub gesture: Gesture,
}

fn default_gesture() -> Gesture {
    Gesture::PointerDown
}

/// POST /api/pickup/interact
pub async fn pickup_interact(
    State(state): State<AppState>,
    Json(request): Json<InteractRequest>,
) -> Result<Json<CarouselSnapshot>, PickupError> {
    Ok(Json(state.carousel.send(CarouselInput::Gesture(request.gesture)).await?))
}

/// POST /api/pickup/dot/:index
pub async fn pickup_dot(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<CarouselSnapshot>, PickupError> {
    let current = state.carousel.snapshot().await?;
    if index >= current.codes.len() {
        return Err(PickupError::InvalidIndex(index));
    }
    Ok(Json(state.carousel.send(CarouselInput::DotClicked(index)).await?))
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

/// POST /api/pickup/visibility
pub async fn pickup_visibility(
    State(state): State<AppState>,
    Json(request): Json<VisibilityRequest>,
) -> Result<Json<CarouselSnapshot>, PickupError> {
    Ok(Json(state.carousel.send(CarouselInput::Visibility(request.visible)).await?))
}

/// POST /api/pickup/scroll
///
/// The active index follows once reports stop for the settle period.
pub async fn pickup_scroll(
    State(state): State<AppState>,
    Json(geometry): Json<ScrollGeometry>,
) -> Result<Json<CarouselSnapshot>, PickupError> {
    Ok(Json(state.carousel.report_scroll(geometry).await?))
}

/// POST /api/pickup/close
pub async fn pickup_close(
    State(state): State<AppState>,
) -> Result<Json<CarouselSnapshot>, PickupError> {
    Ok(Json(state.carousel.send(CarouselInput::Close).await?))
}

/// Carousel API errors
#[derive(Debug)]
pub enum PickupError {
    InvalidIndex(usize),
    Unavailable(String),
}

impl From<CarouselError> for PickupError {
    fn from(e: CarouselError) -> Self {
        PickupError::Unavailable(e.to_string())
    }
}

impl IntoResponse for PickupError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            PickupError::InvalidIndex(index) => {
                (StatusCode::BAD_REQUEST, format!("No pickup item at index {}", index))
            }
            PickupError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Carousel unavailable: {}", msg),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
