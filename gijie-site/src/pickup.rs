//! Pickup selection
//!
//! Chooses the highlighted characters for the landing-page carousel and
//! derives their display text.

use gijie_common::carousel::MAX_CAROUSEL_ITEMS;
use gijie_common::loader::LoadOutcome;
use gijie_common::{Character, SiteData};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::artwork::ArtworkIndex;

/// Does the character have text worth showing in a pickup slide?
fn has_presentable_text(data: &SiteData, character: &Character) -> bool {
    !character.catchcopy.trim().is_empty()
        || data
            .synopsis_of(character)
            .is_some_and(|s| !s.summary.trim().is_empty())
}

/// Characters eligible for the pickup
///
/// Text-bearing characters are preferred; when none have text every character
/// is eligible. Characters with checked-missing artwork are dropped unless
/// that would leave nothing.
pub fn pickup_candidates<'a>(data: &'a SiteData, artwork: &ArtworkIndex) -> Vec<&'a Character> {
    let with_text: Vec<&Character> = data
        .characters
        .iter()
        .filter(|c| has_presentable_text(data, c))
        .collect();

    let pool = if with_text.is_empty() {
        data.characters.iter().collect()
    } else {
        with_text
    };

    let with_artwork: Vec<&Character> = pool
        .iter()
        .copied()
        .filter(|c| !artwork.is_missing(&c.code))
        .collect();

    if with_artwork.is_empty() {
        pool
    } else {
        with_artwork
    }
}

/// Choose up to `size` distinct characters at random
///
/// Returns their codes. Nothing is chosen when a required resource failed.
pub fn choose_pickup<R: Rng + ?Sized>(
    outcome: &LoadOutcome,
    artwork: &ArtworkIndex,
    size: usize,
    rng: &mut R,
) -> Vec<String> {
    let data = match outcome.required() {
        Ok(data) => data,
        Err(e) => {
            debug!("No pickup: {}", e);
            return Vec::new();
        }
    };

    let candidates = pickup_candidates(data, artwork);
    let size = size.min(MAX_CAROUSEL_ITEMS);
    let codes: Vec<String> = candidates
        .choose_multiple(rng, size)
        .map(|c| c.code.clone())
        .collect();

    info!(
        "Pickup: {} of {} candidates [{}]",
        codes.len(),
        candidates.len(),
        codes.join(", ")
    );
    codes
}

/// Pickup summary wrapped in one pair of decorative quotes, or "" when the
/// character has no text
///
/// Catchcopy wins over the first synopsis line.
pub fn pickup_summary(data: &SiteData, character: &Character) -> String {
    let catchcopy = character.catchcopy.trim();
    let text = if !catchcopy.is_empty() {
        catchcopy
    } else {
        data.synopsis_of(character)
            .map(|s| s.first_line())
            .unwrap_or("")
    };

    let stripped: String = text.chars().filter(|c| !matches!(c, '〝' | '〟')).collect();
    if stripped.trim().is_empty() {
        String::new()
    } else {
        format!("〝{}〟", stripped)
    }
}

/// "{icon} {name}" for the ex and core arcs, joined with " / "
pub fn arc_line(data: &SiteData, character: &Character) -> String {
    let (ex, core) = data.arcs_of(character);
    [ex, core]
        .into_iter()
        .flatten()
        .map(|arc| arc.label())
        .collect::<Vec<_>>()
        .join(" / ")
}
