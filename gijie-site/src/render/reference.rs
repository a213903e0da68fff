//! About page (arc and series lists) and official links page
//!
//! Each section fails on its own: a failed resource leaves its own short
//! message and the other sections still render.

use gijie_common::models::{ArcDefinition, KeyedList, OfficialAccount, Series};

use super::{load_failure, render, Element};

pub const ARC_LIST_FAILURE: &str = "アーク一覧の読み込みに失敗しました。";
pub const SERIES_LIST_FAILURE: &str = "シリーズ一覧の読み込みに失敗しました。";
pub const LINKS_FAILURE: &str = "公式リンクの読み込みに失敗しました。";

/// Heading label and icon class for an official link category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMeta<'a> {
    pub label: &'a str,
    pub icon: &'static str,
}

/// Known categories get fixed labels; anything else shows its id with a
/// generic link icon
pub fn category_meta(category: &str) -> CategoryMeta<'_> {
    match category {
        "SNS" => CategoryMeta { label: "SNS / 配信", icon: "fa-solid fa-share-nodes" },
        "PORTFOLIO" => CategoryMeta { label: "Portfolio", icon: "fa-regular fa-id-card" },
        "SHOP" => CategoryMeta { label: "Shop / 支援", icon: "fa-solid fa-bag-shopping" },
        "CONTACT" => CategoryMeta { label: "Contact", icon: "fa-regular fa-envelope" },
        other => CategoryMeta { label: other, icon: "fa-solid fa-link" },
    }
}

fn arc_item(code: &str, arc: &ArcDefinition) -> Element {
    let name = if arc.name.is_empty() { code } else { arc.name.as_str() };

    let mut item = Element::new("div")
        .class("about-arc-item")
        .child(Element::new("span").class("arc-icon").text(arc.icon.clone()))
        .child(
            Element::new("span")
                .class("arc-name")
                .text(format!("{}（{}）", name, code)),
        );

    let keywords: Vec<&String> = arc.keywords.iter().filter(|k| !k.is_empty()).collect();
    if !keywords.is_empty() {
        item = item.child(
            Element::new("ul")
                .class("arc-keywords")
                .children(keywords.into_iter().map(|k| Element::new("li").class("arc-keyword").text(k.clone()))),
        );
    }
    item
}

/// Arc list in document order
pub fn arc_list(arcs: Option<&KeyedList<ArcDefinition>>) -> Element {
    let mut container = Element::new("div").id("about-arc-list");
    match arcs {
        Some(arcs) => {
            let entries: Vec<(&str, &ArcDefinition)> = arcs.iter().collect();
            render(&mut container, &entries, |(code, arc)| arc_item(code, arc));
        }
        None => container.replace_children([load_failure(ARC_LIST_FAILURE)]),
    }
    container
}

fn series_item(series: &Series) -> Element {
    Element::new("div")
        .class("about-theme-item")
        .child(
            Element::new("h3")
                .text(format!("{}_{}", series.id, series.key))
                .child(Element::new("br"))
                .child(
                    Element::new("span")
                        .class("about-theme-sub")
                        .text(series.name_ja.clone()),
                ),
        )
        .child(Element::new("p").text(series.description.clone()))
}

/// Series list ordered by numeric id
pub fn series_list(series: Option<Vec<&Series>>) -> Element {
    let mut container = Element::new("div").id("about-series-list");
    match series {
        Some(list) => render(&mut container, &list, |s| series_item(s)),
        None => container.replace_children([load_failure(SERIES_LIST_FAILURE)]),
    }
    container
}

fn account_card(account: &OfficialAccount) -> Element {
    let top = Element::new("div")
        .class("links-account-top")
        .child(
            Element::new("span")
                .class("links-account-label")
                .text(account.label.clone()),
        )
        .maybe(account.handle.as_ref().map(|handle| {
            Element::new("span")
                .class("links-account-handle")
                .text(handle.clone())
        }));

    Element::new("a")
        .class("links-account-card")
        .attr("href", account.url.clone())
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .child(top)
        .child(
            Element::new("p")
                .class("links-account-desc")
                .text(account.desc.clone()),
        )
}

fn category_section(category: &str, accounts: &[OfficialAccount]) -> Element {
    let meta = category_meta(category);
    Element::new("section")
        .class("links-platform-section")
        .child(
            Element::new("h2")
                .class("links-platform-title")
                .child(
                    Element::new("span")
                        .class("links-platform-icon")
                        .child(Element::new("i").class(meta.icon)),
                )
                .child(Element::new("span").text(meta.label)),
        )
        .child(
            Element::new("div")
                .class("links-account-list")
                .children(accounts.iter().map(account_card)),
        )
}

/// Official link categories in document order; empty categories are skipped
pub fn official_links(links: Option<&KeyedList<Vec<OfficialAccount>>>) -> Element {
    let mut container = Element::new("div").id("links-container");
    match links {
        Some(links) => {
            let categories: Vec<(&str, &Vec<OfficialAccount>)> =
                links.iter().filter(|(_, accounts)| !accounts.is_empty()).collect();
            render(&mut container, &categories, |(category, accounts)| {
                category_section(category, accounts)
            });
        }
        None => container.replace_children([load_failure(LINKS_FAILURE)]),
    }
    container
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_list_keeps_document_order() {
        let arcs: KeyedList<ArcDefinition> = serde_json::from_str(
            r#"{"G": {"icon": "🌱", "name": "Grow", "keywords": ["芽吹き"]}, "B": {"icon": "🔥", "name": "Blaze"}}"#,
        )
        .unwrap();
        let html = arc_list(Some(&arcs)).to_html();
        let g = html.find("Grow（G）").unwrap();
        let b = html.find("Blaze（B）").unwrap();
        assert!(g < b);
        assert!(html.contains(r#"<li class="arc-keyword">芽吹き</li>"#));
    }

    #[test]
    fn test_failed_sections_show_their_own_message() {
        assert!(arc_list(None).to_html().contains(ARC_LIST_FAILURE));
        assert!(series_list(None).to_html().contains(SERIES_LIST_FAILURE));
        assert!(official_links(None).to_html().contains(LINKS_FAILURE));
    }

    #[test]
    fn test_series_item_heading() {
        let series = Series {
            id: "0".into(),
            key: "Occupation".into(),
            name_ja: "職業".into(),
            description: "説明".into(),
        };
        let html = series_list(Some(vec![&series])).to_html();
        assert!(html.contains(r#"<h3>0_Occupation<br><span class="about-theme-sub">職業</span></h3>"#));
        assert!(html.contains("<p>説明</p>"));
    }

    #[test]
    fn test_official_links_categories() {
        let links: KeyedList<Vec<OfficialAccount>> = serde_json::from_str(
            r#"{
                "SHOP": [{"url": "https://shop.example", "label": "Shop", "desc": "goods"}],
                "EMPTY": [],
                "FANBOX": [{"url": "https://f.example", "label": "Fanbox", "handle": "@gijie"}]
            }"#,
        )
        .unwrap();
        let html = official_links(Some(&links)).to_html();
        assert!(html.contains("Shop / 支援"));
        assert!(html.contains(r#"<i class="fa-solid fa-bag-shopping"></i>"#));
        assert!(html.contains(r#"<span>FANBOX</span>"#));
        assert!(html.contains(r#"<i class="fa-solid fa-link"></i>"#));
        assert!(html.contains(r#"<span class="links-account-handle">@gijie</span>"#));
        assert!(!html.contains("EMPTY"));
        assert!(html.find("Shop / 支援").unwrap() < html.find("FANBOX").unwrap());
    }

    #[test]
    fn test_category_meta() {
        assert_eq!(category_meta("CONTACT").icon, "fa-regular fa-envelope");
        assert_eq!(category_meta("Other").label, "Other");
    }
}
