//! Integration tests for gijie-site pages and API endpoints
//!
//! Tests cover:
//! - Listing page: cards, filters, sort, required-resource failure
//! - Detail page: known, unknown and missing codes
//! - About and links pages with per-section failures
//! - JSON listing, color classification, build info, health
//! - Pickup carousel endpoints
//! - Reload (including concurrent reloads)
//! - Static image serving

use std::path::Path;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use gijie_common::config::SiteConfig;
use gijie_site::{build_router, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

const CHARACTERS: &str = r##"[
  {"code": "B01", "title": "ほのお", "titleYomi": "ほのお", "catchcopy": "燃える心",
   "colors": ["#ff0000"], "mainColorLabel": "紅", "theme": "炎", "series": "0",
   "arc": {"ex": "B", "core": "F"}},
  {"code": "B02", "title": "アクア", "titleYomi": "あくあ", "colors": ["#0080ff"],
   "series": "1", "arc": {"core": "F"}},
  {"code": "C01", "title": "Gray", "colors": [], "series": "1"}
]"##;

const SERIES: &str = r#"{
  "1": {"id": "1", "key": "Nature", "nameJa": "自然", "description": "自然のシリーズ"},
  "0": {"id": "0", "key": "Occupation", "nameJa": "職業", "description": "職業のシリーズ"}
}"#;

const ARCS: &str = r#"{
  "F": {"icon": "🌊", "name": "Flow", "keywords": ["流れ"]},
  "B": {"icon": "🔥", "name": "Blaze", "keywords": ["衝動", "情熱"]}
}"#;

const LINKS: &str = r#"{
  "B01": {"video": [{"url": "https://www.youtube.com/watch?v=abcdef123", "label": "", "embed": true}],
          "music": [{"url": "https://music.example/b01", "label": "Theme song"}]}
}"#;

const SYNOPSIS: &str = r#"{
  "B02": {"summary": "水の物語\n二行目", "keywords": ["水"]}
}"#;

const OFFICIAL_LINKS: &str = r#"{
  "SNS": [{"url": "https://x.com/gijie", "label": "X", "handle": "@gijie", "desc": "更新情報"}],
  "SHOP": []
}"#;

/// Test helper: write the data files and B01's artwork into a temp root
fn setup_site() -> TempDir {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    for (name, content) in [
        ("characters.json", CHARACTERS),
        ("series.json", SERIES),
        ("arcList.json", ARCS),
        ("links.json", LINKS),
        ("synopsis.json", SYNOPSIS),
        ("officialLinks.json", OFFICIAL_LINKS),
    ] {
        std::fs::write(data.join(name), content).unwrap();
    }

    let images = dir.path().join("images/characters");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::write(images.join("B01.png"), b"\x89PNG fake").unwrap();
    dir
}

/// Test helper: build the app over a site root
async fn setup_app(root: &Path) -> (AppState, axum::Router) {
    let state = AppState::initialize(SiteConfig::with_root(root))
        .await
        .expect("Should initialize state");
    let app = build_router(state.clone());
    (state, app)
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn get_html(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app.clone().oneshot(test_request("GET", uri)).await.unwrap();
    let status = response.status();
    (status, extract_text(response.into_body()).await)
}

// =============================================================================
// Health / Build Info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "gijie-site");
    assert_eq!(body["data"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let response = app.oneshot(test_request("GET", "/api/buildinfo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body["git_hash"].is_string());
    assert!(body["build_timestamp"].is_string());
}

// =============================================================================
// Listing Page
// =============================================================================

#[tokio::test]
async fn test_listing_renders_cards_in_source_order() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (status, html) = get_html(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>ぎじえプロジェクト</title>"));

    let b01 = html.find(r#"<a class="card" href="character?code=B01""#).unwrap();
    let b02 = html.find(r#"data-code="B02""#).unwrap();
    let c01 = html.find(r#"data-code="C01""#).unwrap();
    assert!(b01 < b02 && b02 < c01);
    assert!(html.contains("3件"));
}

#[tokio::test]
async fn test_listing_missing_artwork_is_coming_soon() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/").await;
    assert!(html.contains(r#"<div class="card is-coming-soon" aria-disabled="true" data-code="B02">"#));
    assert!(!html.contains("character?code=B02"));
}

#[tokio::test]
async fn test_listing_text_filter() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/?q=B01").await;
    assert!(html.contains(r#"data-code="B01""#));
    assert!(!html.contains(r#"data-code="B02""#));
    assert!(html.contains("1件"));
}

#[tokio::test]
async fn test_listing_facet_filters() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/?series=1&color=mono").await;
    assert!(html.contains(r#"data-code="C01""#));
    assert!(!html.contains(r#"class="card" href="character?code=B01""#));

    let (_, html) = get_html(&app, "/?arc=F&arc=B&series=0,1").await;
    assert!(html.contains("2件"));
}

#[tokio::test]
async fn test_listing_yomi_sort() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/?sort=yomi").await;
    let cards = html.find(r#"id="card-list""#).unwrap();
    let c01 = html[cards..].find(r#"data-code="C01""#).unwrap();
    let b02 = html[cards..].find(r#"data-code="B02""#).unwrap();
    let b01 = html[cards..].find(r#"data-code="B01""#).unwrap();
    assert!(c01 < b02 && b02 < b01);
    assert!(html.contains(r#"class="sort-btn is-active" href="/?sort=yomi""#));
}

#[tokio::test]
async fn test_listing_no_match_message() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/?q=zzz").await;
    assert!(html.contains("条件に一致するキャラクターがいません。"));
}

#[tokio::test]
async fn test_required_resource_404_shows_failure_and_no_cards() {
    let site = setup_site();
    std::fs::remove_file(site.path().join("data/characters.json")).unwrap();
    let (_, app) = setup_app(site.path()).await;

    let (status, html) = get_html(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("キャラクター一覧の読み込みに失敗しました。"));
    assert!(!html.contains(r#"class="card""#));
    assert!(!html.contains("pickup-section"));

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/characters"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("status 404"));

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["data"], "degraded");
}

#[tokio::test]
async fn test_optional_resource_failure_is_silent() {
    let site = setup_site();
    std::fs::write(site.path().join("data/links.json"), "{ not json").unwrap();
    std::fs::remove_file(site.path().join("data/synopsis.json")).unwrap();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/").await;
    assert!(html.contains(r#"data-code="B01""#));
    assert!(!html.contains("失敗しました"));

    let (_, html) = get_html(&app, "/character?code=B01").await;
    assert!(html.contains("関連コンテンツは準備中です。"));
    assert!(!html.contains("MUSIC VIDEO"));
}

// =============================================================================
// Detail Page
// =============================================================================

#[tokio::test]
async fn test_detail_page() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (status, html) = get_html(&app, "/character?code=B01").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>ほのお | ぎじえプロジェクト</title>"));
    assert!(html.contains(r#"style="--char-main-color: #ff0000""#));
    assert!(html.contains("No.B01"));
    assert!(html.contains("〝燃える心〟"));
    assert!(html.contains("シリーズ：職業"));
    assert!(html.contains("🔥 Blaze"));
    assert!(html.contains("🌊 Flow"));
    assert!(html.contains("https://www.youtube.com/embed/abcdef123"));
    assert!(html.contains("ほのお - Music Video"));
    assert!(html.contains(">Theme song</a>"));
    assert_eq!(html.matches("一覧に戻る").count(), 2);
}

#[tokio::test]
async fn test_detail_page_story_and_unset_arc() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/character?code=B02").await;
    assert!(html.contains(r#"<p class="char-story-text">水の物語<br>二行目</p>"#));
    assert!(html.contains("未設定"));
    assert!(html.contains("images/ui/card-placeholder.png"));
}

#[tokio::test]
async fn test_detail_unknown_or_missing_code_is_empty_shell() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    for uri in ["/character?code=ZZZ", "/character"] {
        let (status, html) = get_html(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"<div id="character-content"></div>"#));
        assert!(!html.contains("--char-main-color"));
    }
}

// =============================================================================
// Reference Pages
// =============================================================================

#[tokio::test]
async fn test_about_page() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/about").await;
    // Arcs keep document order, series sort by id
    assert!(html.find("Flow（F）").unwrap() < html.find("Blaze（B）").unwrap());
    assert!(html.find("0_Occupation").unwrap() < html.find("1_Nature").unwrap());
}

#[tokio::test]
async fn test_about_page_sections_fail_independently() {
    let site = setup_site();
    std::fs::remove_file(site.path().join("data/arcList.json")).unwrap();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/about").await;
    assert!(html.contains("アーク一覧の読み込みに失敗しました。"));
    assert!(html.contains("0_Occupation"));
}

#[tokio::test]
async fn test_links_page() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let (_, html) = get_html(&app, "/links").await;
    assert!(html.contains("SNS / 配信"));
    assert!(html.contains("@gijie"));
    assert!(!html.contains("Shop / 支援"));

    std::fs::remove_file(site.path().join("data/officialLinks.json")).unwrap();
    let (state, app) = setup_app(site.path()).await;
    assert!(state.snapshot().await.outcome.required_failure().is_none());
    let (_, html) = get_html(&app, "/links").await;
    assert!(html.contains("公式リンクの読み込みに失敗しました。"));
}

// =============================================================================
// JSON API
// =============================================================================

#[tokio::test]
async fn test_characters_api() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let response = app
        .oneshot(test_request("GET", "/api/characters?color=red&sort=yomi"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 48);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["sort"], "title_yomi");

    let first = &body["characters"][0];
    assert_eq!(first["code"], "B01");
    assert_eq!(first["series_name"], "職業");
    assert_eq!(first["color_groups"], serde_json::json!(["red"]));
    assert_eq!(first["detail_href"], "character?code=B01");
    assert_eq!(first["coming_soon"], false);
}

#[tokio::test]
async fn test_characters_api_marks_coming_soon() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let response = app
        .oneshot(test_request("GET", "/api/characters?q=B02"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["characters"][0]["coming_soon"], true);
    assert!(body["characters"][0]["detail_href"].is_null());
}

#[tokio::test]
async fn test_color_api() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/colors/%23ff0000"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["group"], "red");

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/colors/808080"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["group"], "mono");

    let response = app
        .oneshot(test_request("GET", "/api/colors/zz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert!(body["group"].is_null());
}

// =============================================================================
// Pickup
// =============================================================================

#[tokio::test]
async fn test_pickup_prefers_text_and_artwork() {
    let site = setup_site();
    let (state, app) = setup_app(site.path()).await;

    // B01 and B02 have text; only B01 has artwork
    assert_eq!(state.snapshot().await.pickup, vec!["B01".to_string()]);

    let (_, html) = get_html(&app, "/").await;
    assert!(html.contains(r#"id="pickup-section""#));
    assert!(html.contains(r#"<p class="pickup-summary">〝燃える心〟</p>"#));
    assert!(html.contains("🔥 Blaze / 🌊 Flow"));

    let response = app
        .oneshot(test_request("GET", "/api/pickup/state"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["codes"], serde_json::json!(["B01"]));
    assert_eq!(body["phase"], "idle_auto");
}

#[tokio::test]
async fn test_pickup_interaction_endpoints() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let response = app
        .clone()
        .oneshot(json_request("/api/pickup/interact", r#"{"gesture": "wheel"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["phase"], "paused");

    let response = app
        .clone()
        .oneshot(json_request("/api/pickup/visibility", r#"{"visible": false}"#))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["visible"], false);

    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/pickup/dot/0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(test_request("POST", "/api/pickup/dot/5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pickup_scroll_report_accepted() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let response = app
        .oneshot(json_request(
            "/api/pickup/scroll",
            r#"{"container_left": 0, "container_width": 300, "items": [{"left": 0, "width": 300}]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["active"], 0);
}

#[tokio::test]
async fn test_pickup_close_removes_section() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/pickup"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/pickup/close"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["phase"], "disposed");

    let response = app
        .clone()
        .oneshot(test_request("GET", "/pickup"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (_, html) = get_html(&app, "/").await;
    assert!(!html.contains("pickup-section"));
}

// =============================================================================
// Reload
// =============================================================================

#[tokio::test]
async fn test_reload_picks_up_new_data() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    std::fs::write(
        site.path().join("data/characters.json"),
        r#"[{"code": "N01", "title": "New", "series": "0"}]"#,
    )
    .unwrap();

    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/reload"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["generation"], 2);
    assert_eq!(body["characters"], 1);
    assert_eq!(body["failures"], serde_json::json!([]));

    let (_, html) = get_html(&app, "/").await;
    assert!(html.contains(r#"data-code="N01""#));
    assert!(!html.contains(r#"data-code="B01""#));
    // Pickup slide for the new data is rendered at the carousel's index
    assert!(html.contains(r#"<div class="pickup-inner" data-index="0" data-code="N01">"#));
}

#[tokio::test]
async fn test_reload_publishes_data_before_carousel_codes() {
    let site = setup_site();
    let (state, _) = setup_app(site.path()).await;

    std::fs::write(
        site.path().join("data/characters.json"),
        r#"[{"code": "N01", "title": "New", "catchcopy": "new", "series": "0"}]"#,
    )
    .unwrap();
    state.reload().await.unwrap();

    // Every code the carousel announces resolves against the published data
    let carousel = state.carousel.snapshot().await.unwrap();
    let snapshot = state.snapshot().await;
    assert_eq!(carousel.codes, vec!["N01".to_string()]);
    assert!(carousel.codes.iter().all(|c| snapshot.data().find(c).is_some()));
}

#[tokio::test]
async fn test_concurrent_reloads_are_serialized() {
    let site = setup_site();
    let (state, _) = setup_app(site.path()).await;

    let (a, b) = tokio::join!(state.reload(), state.reload());
    let mut generations = vec![a.unwrap().generation, b.unwrap().generation];
    generations.sort();
    assert_eq!(generations, vec![2, 3]);
    assert_eq!(state.snapshot().await.generation, 3);
}

// =============================================================================
// Static Assets
// =============================================================================

#[tokio::test]
async fn test_character_images_are_served() {
    let site = setup_site();
    let (_, app) = setup_app(site.path()).await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/images/characters/B01.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(test_request("GET", "/images/characters/B02.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
