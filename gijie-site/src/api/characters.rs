//! Character listing and color classification API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gijie_common::color::{classify_hex, color_groups_of, ColorGroup};
use gijie_common::{Character, SiteData};
use serde::Serialize;
use serde_json::json;

use crate::artwork::ArtworkIndex;
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::query::ListingQuery;
use crate::AppState;

/// One character in a listing response
#[derive(Debug, Serialize)]
pub struct CharacterSummary {
    pub code: String,
    pub title: String,
    pub title_yomi: String,
    pub series_id: String,
    pub series_name: Option<String>,
    pub color_groups: Vec<ColorGroup>,
    pub main_color: Option<String>,
    pub image: String,
    /// `None` when the card is not navigable (artwork missing)
    pub detail_href: Option<String>,
    pub coming_soon: bool,
}

impl CharacterSummary {
    fn new(character: &Character, data: &SiteData, artwork: &ArtworkIndex) -> Self {
        let coming_soon = artwork.is_missing(&character.code);
        Self {
            code: character.code.clone(),
            title: character.title.clone(),
            title_yomi: character.title_yomi.clone(),
            series_id: character.series.clone(),
            series_name: data.series_of(character).map(|s| s.name_ja.clone()),
            color_groups: color_groups_of(character).into_iter().collect(),
            main_color: character.main_color().map(str::to_string),
            image: character.image_path(),
            detail_href: (!coming_soon).then(|| character.detail_href()),
            coming_soon,
        }
    }
}

/// Listing response with pagination metadata
#[derive(Debug, Serialize)]
pub struct CharacterListResponse {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub sort: &'static str,
    pub characters: Vec<CharacterSummary>,
}

/// GET /api/characters
///
/// Same query parameters as the listing page.
pub async fn list_characters(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CharacterListResponse>, CharacterApiError> {
    let snapshot = state.snapshot().await;
    let data = snapshot
        .outcome
        .required()
        .map_err(|e| CharacterApiError::DataUnavailable(e.to_string()))?;

    let query = ListingQuery::from_pairs(&pairs);
    let view = query.state.view(&data.characters, &state.config.filter);
    let pagination = calculate_pagination(view.len(), query.page);

    let characters = pagination
        .slice(&view)
        .iter()
        .map(|c| CharacterSummary::new(c, data, &snapshot.artwork))
        .collect();

    Ok(Json(CharacterListResponse {
        total: view.len(),
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        sort: query.state.sort.as_str(),
        characters,
    }))
}

/// Classification of one color
#[derive(Debug, Serialize)]
pub struct ColorResponse {
    pub hex: String,
    /// `None` for malformed input
    pub group: Option<ColorGroup>,
    pub label: Option<&'static str>,
}

/// GET /api/colors/:hex
///
/// Accepts the hex with or without a leading `#` (URL-encoded as `%23`).
pub async fn classify_color(Path(hex): Path<String>) -> Json<ColorResponse> {
    let group = classify_hex(&hex);
    Json(ColorResponse {
        hex,
        group,
        label: group.map(|g| g.label_ja()),
    })
}

/// Character API errors
#[derive(Debug)]
pub enum CharacterApiError {
    /// A required data file failed to load
    DataUnavailable(String),
}

impl IntoResponse for CharacterApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CharacterApiError::DataUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Data unavailable: {}", msg),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
