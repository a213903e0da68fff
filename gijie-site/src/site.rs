//! Loaded site snapshot
//!
//! One load pass produces an immutable snapshot: the loader outcome, the
//! artwork check and the pickup choice. Handlers share it behind an `Arc`;
//! a reload swaps in a new one.

use gijie_common::config::SiteConfig;
use gijie_common::loader::{LoadOutcome, Loader};
use gijie_common::SiteData;
use tracing::info;

use crate::artwork::ArtworkIndex;
use crate::pickup::choose_pickup;

#[derive(Debug, Clone, Default)]
pub struct SiteSnapshot {
    /// Load counter, starting at 1
    pub generation: u64,
    pub outcome: LoadOutcome,
    pub artwork: ArtworkIndex,
    /// Codes chosen for the pickup carousel
    pub pickup: Vec<String>,
}

impl SiteSnapshot {
    pub async fn load(loader: &Loader, config: &SiteConfig, generation: u64) -> Self {
        let outcome = loader.load().await;
        let artwork = ArtworkIndex::probe(
            &config.assets_dir,
            &outcome.data.characters,
            config.image_policy,
        )
        .await;
        let pickup = choose_pickup(&outcome, &artwork, config.pickup.size, &mut rand::thread_rng());

        info!(
            "Site data generation {} ready ({} characters)",
            generation,
            outcome.data.characters.len()
        );

        Self {
            generation,
            outcome,
            artwork,
            pickup,
        }
    }

    pub fn data(&self) -> &SiteData {
        &self.outcome.data
    }
}
