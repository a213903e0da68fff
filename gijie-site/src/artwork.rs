//! Character artwork availability
//!
//! Under the preflight policy every character's artwork file is checked once
//! per load; the result decides how cards and pickup slides render. Under the
//! fallback policy nothing is checked and the browser swaps to the
//! placeholder on error.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use gijie_common::config::ImagePolicy;
use gijie_common::Character;
use tracing::{debug, info};

use crate::render::ImageState;

/// Result of the artwork check for one load
#[derive(Debug, Clone, Default)]
pub struct ArtworkIndex {
    policy: ImagePolicy,
    missing: HashSet<String>,
}

impl ArtworkIndex {
    /// Index that checked nothing (fallback policy)
    pub fn unchecked() -> Self {
        Self {
            policy: ImagePolicy::Fallback,
            missing: HashSet::new(),
        }
    }

    /// Check artwork for every character under `assets_dir`
    pub async fn probe(assets_dir: &Path, characters: &[Character], policy: ImagePolicy) -> Self {
        if policy == ImagePolicy::Fallback {
            debug!("Image policy is fallback, skipping artwork preflight");
            return Self::unchecked();
        }

        let checks = characters.iter().map(|c| async move {
            let present = match artwork_file(assets_dir, c) {
                Some(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
                None => false,
            };
            (c.code.clone(), present)
        });

        let missing: HashSet<String> = join_all(checks)
            .await
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(code, _)| code)
            .collect();

        info!(
            "Artwork preflight: {} of {} characters missing artwork",
            missing.len(),
            characters.len()
        );

        Self { policy, missing }
    }

    pub fn policy(&self) -> ImagePolicy {
        self.policy
    }

    /// True only when the file was checked and is absent
    pub fn is_missing(&self, code: &str) -> bool {
        self.missing.contains(code)
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    pub fn state_of(&self, code: &str) -> ImageState {
        match self.policy {
            ImagePolicy::Fallback => ImageState::Unchecked,
            ImagePolicy::Preflight if self.is_missing(code) => ImageState::Missing,
            ImagePolicy::Preflight => ImageState::Available,
        }
    }
}

/// Artwork file for a character; `None` when the code cannot name a file
fn artwork_file(assets_dir: &Path, character: &Character) -> Option<PathBuf> {
    let code = character.code.as_str();
    if code.is_empty() || code.contains(['/', '\\']) || code.contains("..") {
        return None;
    }
    Some(assets_dir.join(character.image_file()))
}
