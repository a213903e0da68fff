//! gijie-site library - character showcase site
//!
//! Server-side rendering of the listing, detail, pickup and reference pages,
//! plus a small JSON API and the pickup carousel event stream.

use std::sync::Arc;

use axum::Router;
use gijie_common::config::SiteConfig;
use gijie_common::loader::Loader;
use tokio::sync::{Mutex, RwLock};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod artwork;
pub mod carousel;
pub mod pagination;
pub mod pickup;
pub mod query;
pub mod render;
pub mod site;

use carousel::{CarouselError, CarouselHandle};
use site::SiteSnapshot;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    loader: Loader,
    snapshot: Arc<RwLock<Arc<SiteSnapshot>>>,
    /// Serializes reloads
    reload_lock: Arc<Mutex<()>>,
    pub carousel: CarouselHandle,
}

impl AppState {
    /// Load the site data once and start the carousel driver
    pub async fn initialize(config: SiteConfig) -> Result<Self, CarouselError> {
        let loader = Loader::new(config.data_source.clone());
        let snapshot = SiteSnapshot::load(&loader, &config, 1).await;
        let carousel = CarouselHandle::spawn(snapshot.pickup.clone(), config.pickup.timing)?;

        Ok(Self {
            config: Arc::new(config),
            loader,
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            reload_lock: Arc::new(Mutex::new(())),
            carousel,
        })
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> Arc<SiteSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Re-run the loader and swap in the new snapshot
    ///
    /// Concurrent calls run one after another; readers keep the previous
    /// snapshot until the swap.
    pub async fn reload(&self) -> Result<Arc<SiteSnapshot>, CarouselError> {
        let _guard = self.reload_lock.lock().await;

        let generation = self.snapshot.read().await.generation + 1;
        let snapshot = Arc::new(SiteSnapshot::load(&self.loader, &self.config, generation).await);
        // Publish the data before the carousel can announce codes from it
        *self.snapshot.write().await = snapshot.clone();
        self.carousel.reset(snapshot.pickup.clone()).await?;

        info!("Reload complete (generation {})", generation);
        Ok(snapshot)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let images = ServeDir::new(state.config.assets_dir.join("images"));
    let styles = ServeDir::new(state.config.assets_dir.join("css"));

    let pages = Router::new()
        .route("/", get(api::listing_page))
        .route("/character", get(api::character_page))
        .route("/pickup", get(api::pickup_fragment))
        .route("/about", get(api::about_page))
        .route("/links", get(api::links_page));

    let data = Router::new()
        .route("/api/characters", get(api::list_characters))
        .route("/api/colors/:hex", get(api::classify_color))
        .route("/api/reload", post(api::reload_data))
        .route("/api/buildinfo", get(api::get_build_info));

    Router::new()
        .merge(pages)
        .merge(data)
        .merge(api::pickup_routes())
        .merge(api::health_routes())
        .nest_service("/images", images)
        .nest_service("/css", styles)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
