//! Character detail page

use gijie_common::color::parse_hex;
use gijie_common::models::{LinkEntry, LinkItem};
use gijie_common::video::{embed_url, extract_video_id};
use gijie_common::{Character, SiteData};

use super::{character_image, Element, SITE_NAME};
use crate::artwork::ArtworkIndex;

/// Shown in the gallery when a character has no links at all
pub const GALLERY_EMPTY: &str = "関連コンテンツは準備中です。";

const UNSET_ARC: &str = "未設定";
const NO_VALUE: &str = "―";
const BACK_LABEL: &str = "一覧に戻る";

pub fn detail_title(character: &Character) -> String {
    format!("{} | {}", character.title, SITE_NAME)
}

/// `--char-main-color` declaration for the page root, when the main color
/// is a valid hex color
pub fn main_color_style(character: &Character) -> Option<String> {
    character
        .main_color()
        .filter(|hex| parse_hex(hex).is_some())
        .map(|hex| format!("--char-main-color: {}", hex))
}

/// Detail container; empty when there is nothing to show
fn content_container() -> Element {
    Element::new("div").id("character-content")
}

/// Page body for an unknown or missing code: the shell with no content
pub fn empty_detail_main() -> Element {
    Element::new("main")
        .class("l-main")
        .child(content_container())
}

pub fn detail_main(character: &Character, data: &SiteData, artwork: &ArtworkIndex) -> Element {
    let links = data.links_of(character);

    let article = Element::new("article")
        .class("char-page")
        .child(back_link(false))
        .child(hero(character, data, artwork))
        .child(
            Element::new("section")
                .class("section-card char-section")
                .child(Element::new("h2").class("char-section-title").text("INFORMATION"))
                .child(info_grid(character, data)),
        )
        .maybe(links.and_then(|l| mv_section(character, l)))
        .child(
            Element::new("section")
                .class("section-card char-section")
                .child(Element::new("h2").class("char-section-title").text("GALLERY"))
                .children(gallery(links)),
        )
        .child(back_link(true));

    Element::new("main")
        .class("l-main")
        .child(content_container().child(article))
}

fn back_link(bottom: bool) -> Element {
    let class = if bottom {
        "char-back-btn bottom"
    } else {
        "char-back-btn"
    };
    Element::new("a").attr("href", "/").class(class).text(BACK_LABEL)
}

fn hero(character: &Character, data: &SiteData, artwork: &ArtworkIndex) -> Element {
    let mut tags = Element::new("div").class("char-hero-tags");
    if let Some(series) = data.series_of(character) {
        tags = tags.child(tag("char-tag", format!("シリーズ：{}", series.name_ja)));
    }
    if !character.theme.is_empty() {
        tags = tags.child(tag("char-tag", format!("テーマ：{}", character.theme)));
    }
    if !character.main_color_label.is_empty() {
        tags = tags.child(tag(
            "char-tag char-tag-maincolor",
            format!("メインカラー：{}", character.main_color_label),
        ));
    }

    let yomi = (!character.title_yomi.is_empty()).then(|| {
        Element::new("div")
            .class("char-hero-yomi")
            .text(character.title_yomi.clone())
    });
    let catchcopy = (!character.catchcopy.trim().is_empty()).then(|| {
        Element::new("p")
            .class("char-hero-catch")
            .text(format!("〝{}〟", character.catchcopy.trim()))
    });

    let meta = Element::new("div")
        .class("char-hero-meta")
        .child(
            Element::new("div")
                .class("char-hero-code")
                .text(format!("No.{}", character.code)),
        )
        .child(Element::new("h1").class("char-hero-title").text(character.title.clone()))
        .maybe(yomi)
        .maybe(catchcopy)
        .child(tags)
        .maybe(story_block(character, data));

    Element::new("section")
        .class("char-hero")
        .child(Element::new("div").class("char-hero-card").child(character_image(
            &character.image_path(),
            &character.title,
            "char-hero-image",
            artwork.state_of(&character.code),
        )))
        .child(meta)
}

fn tag(class: &'static str, text: String) -> Element {
    Element::new("span").class(class).text(text)
}

/// STORY block; `None` when there is neither summary nor keywords
fn story_block(character: &Character, data: &SiteData) -> Option<Element> {
    let synopsis = data.synopsis_of(character)?;
    let has_summary = !synopsis.summary.trim().is_empty();
    let keywords: Vec<&String> = synopsis.keywords.iter().filter(|k| !k.is_empty()).collect();
    if !has_summary && keywords.is_empty() {
        return None;
    }

    let mut block = Element::new("div")
        .class("char-story-block")
        .child(Element::new("h3").class("char-story-title").text("STORY"));

    if has_summary {
        let mut text = Element::new("p").class("char-story-text");
        for (i, line) in synopsis.paragraphs().into_iter().enumerate() {
            if i > 0 {
                text = text.child(Element::new("br"));
            }
            text = text.text(line);
        }
        block = block.child(text);
    }

    if !keywords.is_empty() {
        block = block.child(
            Element::new("ul")
                .class("char-keywords-list")
                .children(keywords.into_iter().map(|k| Element::new("li").text(k.clone()))),
        );
    }

    Some(block)
}

fn info_column(rows: Vec<(&str, String)>) -> Element {
    Element::new("div")
        .class("char-info-col")
        .children(rows.into_iter().map(|(label, value)| {
            Element::new("div")
                .class("char-info-row")
                .child(Element::new("div").class("char-info-label").text(label))
                .child(Element::new("div").class("char-info-value").text(value))
        }))
}

/// Two-column information grid: colors on the left, arcs on the right
pub fn info_grid(character: &Character, data: &SiteData) -> Element {
    let color_codes: Vec<&str> = character
        .colors
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    let main_label = if character.main_color_label.is_empty() {
        NO_VALUE.to_string()
    } else {
        character.main_color_label.clone()
    };
    let codes = if color_codes.is_empty() {
        NO_VALUE.to_string()
    } else {
        color_codes.join(" / ")
    };

    let (ex, core) = data.arcs_of(character);
    let arc_value = |arc: Option<&gijie_common::models::ArcDefinition>| {
        arc.map(|a| a.label()).unwrap_or_else(|| UNSET_ARC.to_string())
    };

    Element::new("div")
        .class("char-info-grid")
        .child(info_column(vec![
            ("メインカラー", main_label),
            ("カラーコード", codes),
        ]))
        .child(info_column(vec![
            ("エクスアーク", arc_value(ex)),
            ("コアアーク", arc_value(core)),
        ]))
}

/// Embedded music video: the first `embed` video with an extractable id
fn mv_section(character: &Character, links: &LinkEntry) -> Option<Element> {
    let (item, video_id) = links
        .video
        .iter()
        .filter(|v| v.embed)
        .find_map(|v| extract_video_id(&v.url).map(|id| (v, id)))?;

    let caption = if item.label.trim().is_empty() {
        format!("{} - Music Video", character.title)
    } else {
        item.label.clone()
    };

    let frame = Element::new("iframe")
        .attr("src", embed_url(&video_id))
        .attr("title", caption.clone())
        .attr("loading", "lazy")
        .attr(
            "allow",
            "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share",
        )
        .attr("allowfullscreen", "allowfullscreen");

    Some(
        Element::new("section")
            .class("section-card char-section char-mv-section")
            .child(Element::new("h2").class("char-section-title").text("MUSIC VIDEO"))
            .child(
                Element::new("div")
                    .class("char-mv-body")
                    .child(Element::new("div").class("char-mv-frame").child(frame))
                    .child(
                        Element::new("p")
                            .class("char-mv-caption")
                            .text(format!("「{}」の MV です。", caption))
                            .child(Element::new("br"))
                            .text("フルサイズは YouTube でもご覧いただけます。"),
                    ),
            ),
    )
}

fn gallery_link(url: &str, label: &str) -> Element {
    let text = if label.trim().is_empty() { url } else { label };
    Element::new("li").class("char-gallery-item").child(
        Element::new("a")
            .attr("href", url)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .text(text),
    )
}

fn gallery_group(heading: &str, items: Vec<Element>) -> Option<Element> {
    if items.is_empty() {
        return None;
    }
    Some(
        Element::new("section")
            .class("char-gallery-group")
            .child(Element::new("h3").class("char-gallery-heading").text(heading))
            .child(Element::new("ul").class("char-gallery-list").children(items)),
    )
}

fn grouped(items: &[LinkItem]) -> Vec<Element> {
    items
        .iter()
        .filter(|i| !i.url.trim().is_empty())
        .map(|i| gallery_link(&i.url, &i.label))
        .collect()
}

/// Gallery groups in fixed order, or the "coming soon" notice
pub fn gallery(links: Option<&LinkEntry>) -> Vec<Element> {
    let groups: Vec<Element> = match links {
        Some(links) => [
            gallery_group("Music", grouped(&links.music)),
            gallery_group("Novel / Text", grouped(&links.novel)),
            gallery_group("Movie / PV", grouped(&links.video)),
            gallery_group(
                "Links",
                links
                    .flat_links()
                    .into_iter()
                    .map(|(label, url)| gallery_link(url, label))
                    .collect(),
            ),
        ]
        .into_iter()
        .flatten()
        .collect(),
        None => Vec::new(),
    };

    if groups.is_empty() {
        vec![Element::new("p").class("char-gallery-empty").text(GALLERY_EMPTY)]
    } else {
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gijie_common::models::{ArcDefinition, ArcSlots, KeyedList, SynopsisEntry};

    fn character() -> Character {
        Character {
            code: "B01".into(),
            title: "Foo".into(),
            title_yomi: "ふう".into(),
            catchcopy: "灯す".into(),
            colors: vec!["".into(), "#ff0000".into(), "#00ff00".into()],
            arc: ArcSlots { ex: Some("B".into()), core: Some("Q".into()) },
            ..Default::default()
        }
    }

    fn data() -> SiteData {
        SiteData {
            characters: vec![character()],
            arcs: KeyedList::new(vec![(
                "B".to_string(),
                ArcDefinition { icon: "🔥".into(), name: "Blaze".into(), keywords: vec![] },
            )]),
            ..Default::default()
        }
    }

    #[test]
    fn test_title_and_main_color() {
        let c = character();
        assert_eq!(detail_title(&c), "Foo | ぎじえプロジェクト");
        assert_eq!(main_color_style(&c).as_deref(), Some("--char-main-color: #ff0000"));
        assert_eq!(main_color_style(&Character::default()), None);

        let injected = Character {
            colors: vec!["red; background: url(x)".into(), "#00ff00".into()],
            ..Default::default()
        };
        assert_eq!(main_color_style(&injected), None);
    }

    #[test]
    fn test_info_grid_values() {
        let html = info_grid(&character(), &data()).to_html();
        assert!(html.contains(r#"<div class="char-info-value">―</div>"#));
        assert!(html.contains("#ff0000 / #00ff00"));
        assert!(html.contains("🔥 Blaze"));
        assert!(html.contains("未設定"));
    }

    #[test]
    fn test_story_block_only_with_content() {
        let mut data = data();
        let html = detail_main(&character(), &data, &ArtworkIndex::unchecked()).to_html();
        assert!(!html.contains("STORY"));

        data.synopsis = KeyedList::new(vec![(
            "B01".to_string(),
            SynopsisEntry { summary: "one\ntwo".into(), keywords: vec!["火".into()] },
        )]);
        let html = detail_main(&character(), &data, &ArtworkIndex::unchecked()).to_html();
        assert!(html.contains(r#"<p class="char-story-text">one<br>two</p>"#));
        assert!(html.contains(r#"<ul class="char-keywords-list"><li>火</li></ul>"#));
    }

    #[test]
    fn test_mv_section_uses_first_embeddable_video() {
        let links: LinkEntry = serde_json::from_str(
            r#"{"video": [
                {"url": "https://example.com/not-a-video", "label": "x", "embed": true},
                {"url": "https://youtu.be/abcdef123", "label": "", "embed": true}
            ]}"#,
        )
        .unwrap();
        let html = mv_section(&character(), &links).unwrap().to_html();
        assert!(html.contains("https://www.youtube.com/embed/abcdef123"));
        assert!(html.contains("「Foo - Music Video」の MV です。"));

        assert!(mv_section(&character(), &LinkEntry::default()).is_none());
    }

    #[test]
    fn test_gallery_groups_and_empty_notice() {
        let html: String = gallery(None).iter().map(Element::to_html).collect();
        assert!(html.contains(GALLERY_EMPTY));

        let links: LinkEntry = serde_json::from_str(
            r#"{"novel": [{"url": "https://n.example/1", "label": "Chapter 1"}], "x": "https://x.com/foo"}"#,
        )
        .unwrap();
        let html: String = gallery(Some(&links)).iter().map(Element::to_html).collect();
        assert!(!html.contains("Music<"));
        assert!(html.contains("Novel / Text"));
        assert!(html.contains(">Chapter 1</a>"));
        assert!(html.contains(r#"<h3 class="char-gallery-heading">Links</h3>"#));
        assert!(!html.contains(GALLERY_EMPTY));
    }

    #[test]
    fn test_empty_detail_is_shell_only() {
        assert_eq!(
            empty_detail_main().to_html(),
            r#"<main class="l-main"><div id="character-content"></div></main>"#
        );
    }
}
