//! Filter/sort engine for character listings
//!
//! `compute_view` is a pure function of (collection, predicate, sort key, policy).
//! The source collection is never reordered; views are derived lists of
//! references, so the original order is always available for reset.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::collate::{collation_key, CollationKey};
use crate::color::{color_groups_of, ColorGroup};
use crate::models::Character;

/// Meaning of an empty facet selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelection {
    /// No selection means the facet does not restrict anything
    #[default]
    MatchAll,
    /// No selection means nothing passes the facet
    MatchNone,
}

/// Per-facet empty-selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterPolicy {
    pub series_empty: EmptySelection,
    pub arc_empty: EmptySelection,
}

/// Listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Source order of `characters.json`
    #[default]
    Original,
    /// Reading order of `titleYomi` (falling back to `title`)
    #[serde(alias = "yomi", alias = "title")]
    TitleYomi,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Original => "original",
            SortKey::TitleYomi => "title_yomi",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortKey::Original => SortKey::TitleYomi,
            SortKey::TitleYomi => SortKey::Original,
        }
    }
}

/// User-selected filter state; all active parts combine with AND
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// Free-text query, matched case-insensitively
    #[serde(default)]
    pub text: String,
    /// Selected series ids
    #[serde(default)]
    pub series: BTreeSet<String>,
    /// Selected arc codes (matched against ex and core)
    #[serde(default)]
    pub arcs: BTreeSet<String>,
    /// Selected color groups; empty means inactive
    #[serde(default)]
    pub colors: BTreeSet<ColorGroup>,
}

impl Predicate {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// True when no part of the predicate is set
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
            && self.series.is_empty()
            && self.arcs.is_empty()
            && self.colors.is_empty()
    }

    /// Does a character pass every active part of the predicate?
    pub fn matches(&self, character: &Character, policy: &FilterPolicy) -> bool {
        self.matches_text(character)
            && self.matches_series(character, policy.series_empty)
            && self.matches_arc(character, policy.arc_empty)
            && self.matches_color(character)
    }

    fn matches_text(&self, character: &Character) -> bool {
        let query = self.text.trim();
        if query.is_empty() {
            return true;
        }

        let haystack = format!(
            "{} {} {} {}",
            character.code, character.title, character.title_yomi, character.main_color_label
        )
        .to_lowercase();
        haystack.contains(&query.to_lowercase())
    }

    fn matches_series(&self, character: &Character, empty: EmptySelection) -> bool {
        if self.series.is_empty() {
            return empty == EmptySelection::MatchAll;
        }
        self.series.contains(&character.series)
    }

    fn matches_arc(&self, character: &Character, empty: EmptySelection) -> bool {
        if self.arcs.is_empty() {
            return empty == EmptySelection::MatchAll;
        }
        [&character.arc.ex, &character.arc.core]
            .into_iter()
            .flatten()
            .any(|code| self.arcs.contains(code))
    }

    fn matches_color(&self, character: &Character) -> bool {
        if self.colors.is_empty() {
            return true;
        }
        color_groups_of(character)
            .iter()
            .any(|group| self.colors.contains(group))
    }
}

/// Filter and order a character collection
///
/// Ties under `TitleYomi` keep source order.
pub fn compute_view<'a>(
    all: &'a [Character],
    predicate: &Predicate,
    sort: SortKey,
    policy: &FilterPolicy,
) -> Vec<&'a Character> {
    let filtered: Vec<&Character> = all
        .iter()
        .filter(|c| predicate.matches(c, policy))
        .collect();

    match sort {
        SortKey::Original => filtered,
        SortKey::TitleYomi => {
            let mut keyed: Vec<(CollationKey, &Character)> = filtered
                .into_iter()
                .map(|c| (collation_key(c.reading()), c))
                .collect();
            // sort_by is stable
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            keyed.into_iter().map(|(_, c)| c).collect()
        }
    }
}

/// Listing page state: current predicate and sort mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingState {
    pub predicate: Predicate,
    pub sort: SortKey,
}

impl ListingState {
    /// Current view over the collection
    pub fn view<'a>(&self, all: &'a [Character], policy: &FilterPolicy) -> Vec<&'a Character> {
        compute_view(all, &self.predicate, self.sort, policy)
    }

    /// Select a sort mode; selecting the current mode changes nothing
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    /// Clear every predicate and return to source order
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
