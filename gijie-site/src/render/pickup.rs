//! Pickup carousel section

use gijie_common::{Character, SiteData};

use super::{character_image, Element};
use crate::artwork::ArtworkIndex;
use crate::pickup::{arc_line, pickup_summary};

/// One carousel slide
fn slide(index: usize, character: &Character, data: &SiteData, artwork: &ArtworkIndex) -> Element {
    let href = character.detail_href();

    let mut meta = Element::new("div").class("pickup-meta");
    if let Some(series) = data.series_of(character) {
        meta = meta.child(
            Element::new("span")
                .class("pickup-series")
                .text(format!("シリーズ：{}", series.name_ja)),
        );
    }
    if !character.theme.is_empty() {
        meta = meta.child(
            Element::new("span")
                .class("pickup-theme")
                .text(format!("テーマ：{}", character.theme)),
        );
    }

    let arcs = arc_line(data, character);
    let summary = pickup_summary(data, character);

    let main = Element::new("div")
        .class("pickup-main")
        .child(
            Element::new("div")
                .class("pickup-title-row")
                .child(
                    Element::new("span")
                        .class("pickup-code")
                        .text(format!("No.{}", character.code)),
                )
                .child(
                    Element::new("a")
                        .attr("href", href.clone())
                        .class("pickup-title")
                        .text(character.title.clone()),
                ),
        )
        .child(meta)
        .maybe((!arcs.is_empty()).then(|| Element::new("div").class("pickup-arc-row").text(arcs)))
        .maybe(
            (!summary.is_empty())
                .then(|| Element::new("p").class("pickup-summary").text(summary)),
        )
        .child(
            Element::new("a")
                .attr("href", href.clone())
                .class("pickup-cta")
                .text("キャラ詳細を見る"),
        );

    Element::new("div")
        .class("pickup-inner")
        .attr("data-index", index.to_string())
        .attr("data-code", character.code.clone())
        .child(
            Element::new("div").class("pickup-thumb").child(
                Element::new("a").attr("href", href).child(character_image(
                    &character.image_path(),
                    &character.title,
                    "pickup-thumb-img",
                    artwork.state_of(&character.code),
                )),
            ),
        )
        .child(main)
}

fn dot(index: usize, active: bool) -> Element {
    let button = Element::new("button")
        .attr("type", "button")
        .class(if active { "pickup-dot is-active" } else { "pickup-dot" })
        .attr("data-index", index.to_string())
        .attr("aria-label", format!("{}件目を表示", index + 1));
    if active {
        button.attr("aria-current", "true")
    } else {
        button
    }
}

/// Pickup section for the given codes; `None` when nothing resolves
///
/// Codes that no longer resolve to a character are skipped. Slides and dots
/// keep the carousel's index for their code, so a skipped code leaves a gap
/// rather than shifting the indices after it.
pub fn pickup_section(
    codes: &[String],
    active: usize,
    data: &SiteData,
    artwork: &ArtworkIndex,
) -> Option<Element> {
    let characters: Vec<(usize, &Character)> = codes
        .iter()
        .enumerate()
        .filter_map(|(i, code)| data.find(code).map(|c| (i, c)))
        .collect();
    if characters.is_empty() {
        return None;
    }

    let slides = characters
        .iter()
        .map(|(i, c)| slide(*i, c, data, artwork));

    let mut section = Element::new("section")
        .class("section-card pickup-section")
        .id("pickup-section")
        .attr("data-events", "/api/pickup/events")
        .child(
            Element::new("button")
                .attr("type", "button")
                .class("pickup-close-btn")
                .attr("aria-label", "ピックアップを閉じる")
                .text("×"),
        )
        .child(Element::new("div").class("pickup-label").text("PICKUP"))
        .child(Element::new("div").class("pickup-track").children(slides));

    if characters.len() > 1 {
        section = section.child(
            Element::new("div")
                .class("pickup-dots")
                .children(characters.iter().map(|(i, _)| dot(*i, *i == active))),
        );
    }

    Some(section)
}
