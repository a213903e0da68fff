//! HTML page handlers
//!
//! Pages never fail with an error status: a failed resource degrades the
//! affected section to its failure message, and a missing or unknown
//! character code yields the empty page shell.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use gijie_common::carousel::CarouselPhase;
use gijie_common::loader::Resource;
use serde::Deserialize;
use tracing::debug;

use crate::pagination::calculate_pagination;
use crate::query::ListingQuery;
use crate::render::{
    detail, listing, load_failure, pickup::pickup_section, reference, Document, Element,
    SITE_NAME,
};
use crate::site::SiteSnapshot;
use crate::AppState;

/// Shown on the detail page when a required resource failed to load
pub const DETAIL_FAILURE: &str = "キャラクター情報の読み込みに失敗しました。";

fn main_element() -> Element {
    Element::new("main").class("l-main")
}

/// Pickup section for the current carousel state; `None` once closed
async fn current_pickup(state: &AppState, snapshot: &SiteSnapshot) -> Option<Element> {
    let carousel = match state.carousel.snapshot().await {
        Ok(carousel) => carousel,
        Err(e) => {
            debug!("No pickup section: {}", e);
            return None;
        }
    };
    if carousel.phase == CarouselPhase::Disposed {
        return None;
    }
    pickup_section(&carousel.codes, carousel.active, snapshot.data(), &snapshot.artwork)
}

/// GET /
///
/// Listing with filters from the query string (`q`, `series`, `arc`,
/// `color`, `sort`, `page`).
pub async fn listing_page(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let snapshot = state.snapshot().await;
    let query = ListingQuery::from_pairs(&pairs);

    let main = match snapshot.outcome.required() {
        Ok(data) => {
            let view = query.state.view(&data.characters, &state.config.filter);
            let pagination = calculate_pagination(view.len(), query.page);
            let cards = pagination.slice(&view);

            main_element()
                .maybe(current_pickup(&state, &snapshot).await)
                .child(listing::filter_panel(data, &query))
                .child(listing::sort_bar(&query))
                .child(listing::card_list(cards, data, &snapshot.artwork))
                .child(listing::page_nav(&query, &pagination, view.len()))
        }
        Err(e) => {
            debug!("Listing degraded: {}", e);
            main_element().child(listing::failed_card_list())
        }
    };

    Html(Document::new(SITE_NAME, "page-index", main).to_html())
}

/// Query parameters for the detail page
#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub code: Option<String>,
}

/// GET /character?code=...
pub async fn character_page(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
) -> Html<String> {
    let snapshot = state.snapshot().await;
    let code = query.code.as_deref().map(str::trim).unwrap_or("");

    let document = match snapshot.outcome.required() {
        Err(e) => {
            debug!("Detail degraded: {}", e);
            let main = main_element().child(
                Element::new("div")
                    .id("character-content")
                    .child(load_failure(DETAIL_FAILURE)),
            );
            Document::new(SITE_NAME, "page-character", main)
        }
        Ok(data) => match data.find(code) {
            Some(character) => {
                let main = detail::detail_main(character, data, &snapshot.artwork);
                let mut document =
                    Document::new(detail::detail_title(character), "page-character", main);
                document.root_style = detail::main_color_style(character);
                document
            }
            None => {
                debug!("No character for code {:?}", code);
                Document::new(SITE_NAME, "page-character", detail::empty_detail_main())
            }
        },
    };

    Html(document.to_html())
}

/// GET /pickup
///
/// The pickup section alone, or 204 when there is nothing to show.
pub async fn pickup_fragment(State(state): State<AppState>) -> Response {
    let snapshot = state.snapshot().await;
    match current_pickup(&state, &snapshot).await {
        Some(section) => Html(section.to_html()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /about
pub async fn about_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.snapshot().await;
    let outcome = &snapshot.outcome;

    let arcs = outcome
        .failure(Resource::Arcs)
        .is_none()
        .then_some(&outcome.data.arcs);
    let series = outcome
        .failure(Resource::Series)
        .is_none()
        .then(|| outcome.data.series_by_id());

    let main = main_element()
        .child(
            Element::new("section")
                .class("section-card about-section")
                .child(Element::new("h2").class("about-section-title").text("ARC"))
                .child(reference::arc_list(arcs)),
        )
        .child(
            Element::new("section")
                .class("section-card about-section")
                .child(Element::new("h2").class("about-section-title").text("SERIES"))
                .child(reference::series_list(series)),
        );

    Html(Document::new(format!("About | {}", SITE_NAME), "page-about", main).to_html())
}

/// GET /links
pub async fn links_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.snapshot().await;
    let outcome = &snapshot.outcome;

    let links = outcome
        .failure(Resource::OfficialLinks)
        .is_none()
        .then_some(&outcome.data.official_links);

    let main = main_element().child(
        Element::new("section")
            .class("section-card links-section")
            .child(Element::new("h2").class("links-section-title").text("OFFICIAL LINKS"))
            .child(reference::official_links(links)),
    );

    Html(Document::new(format!("Links | {}", SITE_NAME), "page-links", main).to_html())
}
