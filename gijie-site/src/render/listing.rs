//! Listing page: filter panel, character cards and page navigation

use gijie_common::color::ColorGroup;
use gijie_common::filter::SortKey;
use gijie_common::{Character, SiteData};

use super::{character_image, load_failure, render, Element, ImageState};
use crate::artwork::ArtworkIndex;
use crate::pagination::Pagination;
use crate::query::ListingQuery;

/// Shown in the card list when a required resource failed to load
pub const LISTING_FAILURE: &str = "キャラクター一覧の読み込みに失敗しました。";

/// Shown when the current filters match nothing
pub const LISTING_EMPTY: &str = "条件に一致するキャラクターがいません。";

/// One listing card
///
/// Cards for checked-missing artwork are not links: they show the
/// placeholder and a "coming soon" badge.
pub fn card(character: &Character, data: &SiteData, artwork: &ArtworkIndex) -> Element {
    let state = artwork.state_of(&character.code);
    let series_name = data
        .series_of(character)
        .map(|s| s.name_ja.clone())
        .unwrap_or_default();

    let image = Element::new("div")
        .class("card-image")
        .child(character_image(
            &character.image_path(),
            &character.title,
            "card-img",
            state,
        ));

    let meta = Element::new("div")
        .class("card-meta")
        .child(Element::new("div").class("card-code").text(character.code.clone()))
        .child(Element::new("div").class("card-title").text(character.title.clone()))
        .child(Element::new("div").class("card-series").text(series_name));

    let inner = Element::new("div").class("card-inner").child(image).child(meta);

    if state == ImageState::Missing {
        Element::new("div")
            .class("card is-coming-soon")
            .attr("aria-disabled", "true")
            .attr("data-code", character.code.clone())
            .child(inner)
            .child(Element::new("span").class("card-badge").text("COMING SOON"))
    } else {
        Element::new("a")
            .class("card")
            .attr("href", character.detail_href())
            .attr("data-code", character.code.clone())
            .child(inner)
    }
}

/// Cards container filled with the given characters, in order
pub fn card_list(characters: &[&Character], data: &SiteData, artwork: &ArtworkIndex) -> Element {
    let mut container = Element::new("div").id("card-list").class("card-list");
    if characters.is_empty() {
        container.replace_children([Element::new("p").class("card-list-empty").text(LISTING_EMPTY)]);
    } else {
        render(&mut container, characters, |c| card(c, data, artwork));
    }
    container
}

/// Cards container holding only the failure message
pub fn failed_card_list() -> Element {
    Element::new("div")
        .id("card-list")
        .class("card-list")
        .child(load_failure(LISTING_FAILURE))
}

fn checkbox(name: &'static str, value: &str, label: &str, checked: bool) -> Element {
    let mut input = Element::new("input")
        .attr("type", "checkbox")
        .attr("name", name)
        .attr("value", value);
    if checked {
        input = input.attr("checked", "checked");
    }
    Element::new("label")
        .class("filter-chip")
        .child(input)
        .child(Element::new("span").text(label))
}

fn chip_group(title: &str, id: &'static str, chips: Vec<Element>) -> Element {
    Element::new("fieldset")
        .class("filter-group")
        .id(id)
        .child(Element::new("legend").text(title))
        .children(chips)
}

/// Filter form (GET /) reflecting the current query
pub fn filter_panel(data: &SiteData, query: &ListingQuery) -> Element {
    let predicate = &query.state.predicate;

    let series_chips = data
        .series_by_id()
        .into_iter()
        .map(|s| checkbox("series", &s.id, &s.name_ja, predicate.series.contains(&s.id)))
        .collect();

    let arc_chips = data
        .arcs
        .iter()
        .map(|(code, arc)| checkbox("arc", code, &arc.label(), predicate.arcs.contains(code)))
        .collect();

    let color_chips = ColorGroup::ALL
        .iter()
        .map(|g| {
            checkbox("color", g.as_str(), g.label_ja(), predicate.colors.contains(g))
                .attr("data-color", g.as_str())
        })
        .collect();

    let mut search = Element::new("input")
        .attr("type", "search")
        .attr("name", "q")
        .attr("placeholder", "コード・名前・読みで検索");
    if !predicate.text.is_empty() {
        search = search.attr("value", predicate.text.clone());
    }

    let mut form = Element::new("form")
        .id("filter-form")
        .class("filter-panel")
        .attr("method", "get")
        .attr("action", "/")
        .child(search)
        .child(chip_group("シリーズ", "filter-series", series_chips))
        .child(chip_group("アーク", "filter-arc", arc_chips))
        .child(chip_group("カラー", "filter-color", color_chips));

    if query.state.sort != SortKey::Original {
        form = form.child(
            Element::new("input")
                .attr("type", "hidden")
                .attr("name", "sort")
                .attr("value", "yomi"),
        );
    }

    form.child(
        Element::new("div")
            .class("filter-actions")
            .child(
                Element::new("button")
                    .attr("type", "submit")
                    .class("filter-apply")
                    .text("絞り込む"),
            )
            .child(
                Element::new("a")
                    .attr("href", "/")
                    .class("filter-reset")
                    .text("リセット"),
            ),
    )
}

/// Sort buttons; the active mode is marked
pub fn sort_bar(query: &ListingQuery) -> Element {
    let button = |id: &'static str, sort: SortKey, label: &str| {
        let href = format!("/{}", query.with_sort(sort).to_query_string(1));
        let class = if query.state.sort == sort {
            "sort-btn is-active"
        } else {
            "sort-btn"
        };
        Element::new("a").id(id).class(class).attr("href", href).text(label)
    };

    Element::new("div")
        .class("sort-bar")
        .child(button("sort-code", SortKey::Original, "コード順"))
        .child(button("sort-title", SortKey::TitleYomi, "読み順"))
}

/// Result count and previous/next links
pub fn page_nav(query: &ListingQuery, pagination: &Pagination, total: usize) -> Element {
    let link = |page: usize, label: &str, class: &'static str| {
        Element::new("a")
            .class(class)
            .attr("href", format!("/{}", query.to_query_string(page)))
            .text(label)
    };

    let mut nav = Element::new("nav")
        .class("listing-pager")
        .child(
            Element::new("span")
                .class("listing-count")
                .text(format!("{}件", total)),
        );

    if pagination.has_prev() {
        nav = nav.child(link(pagination.page - 1, "前へ", "pager-prev"));
    }
    if pagination.total_pages > 1 {
        nav = nav.child(
            Element::new("span")
                .class("pager-position")
                .text(format!("{} / {}", pagination.page, pagination.total_pages)),
        );
    }
    if pagination.has_next() {
        nav = nav.child(link(pagination.page + 1, "次へ", "pager-next"));
    }
    nav
}
