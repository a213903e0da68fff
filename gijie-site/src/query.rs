//! Listing query parameters
//!
//! Facets may repeat (`series=0&series=1`) or be comma-separated
//! (`series=0,1`). Unknown color groups and unknown keys are ignored.

use gijie_common::color::ColorGroup;
use gijie_common::filter::{ListingState, SortKey};

/// Parsed listing request: filter state plus requested page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub state: ListingState,
    pub page: usize,
}

impl ListingQuery {
    /// Build from decoded query pairs
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut query = ListingQuery {
            page: 1,
            ..Default::default()
        };
        let predicate = &mut query.state.predicate;

        for (key, value) in pairs {
            match key.as_str() {
                "q" => predicate.text = value.clone(),
                "series" => predicate.series.extend(split_values(value)),
                "arc" => predicate.arcs.extend(split_values(value)),
                "color" => predicate
                    .colors
                    .extend(split_values(value).filter_map(|v| v.parse::<ColorGroup>().ok())),
                "sort" => query.state.sort = parse_sort(value),
                "page" => query.page = value.trim().parse().unwrap_or(1),
                _ => {}
            }
        }

        query
    }

    /// Query string (with leading `?`) for this state at `page`, or "" when
    /// nothing is set
    pub fn to_query_string(&self, page: usize) -> String {
        let predicate = &self.state.predicate;
        let mut parts = Vec::new();

        if !predicate.text.trim().is_empty() {
            parts.push(format!("q={}", urlencoding::encode(predicate.text.trim())));
        }
        for id in &predicate.series {
            parts.push(format!("series={}", urlencoding::encode(id)));
        }
        for code in &predicate.arcs {
            parts.push(format!("arc={}", urlencoding::encode(code)));
        }
        for group in &predicate.colors {
            parts.push(format!("color={}", group.as_str()));
        }
        if self.state.sort != SortKey::Original {
            parts.push("sort=yomi".to_string());
        }
        if page > 1 {
            parts.push(format!("page={}", page));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }

    /// Same filters with a different sort, back on page 1
    pub fn with_sort(&self, sort: SortKey) -> Self {
        let mut next = self.clone();
        next.state.set_sort(sort);
        next.page = 1;
        next
    }
}

fn split_values(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_sort(value: &str) -> SortKey {
    match value.trim() {
        "yomi" | "title_yomi" | "title" => SortKey::TitleYomi,
        _ => SortKey::Original,
    }
}
