//! Data model for the showcase data files
//!
//! All entities are read-only after load. Optional fields carry documented
//! defaults so that rendering never has to guard against missing keys:
//! absent strings are empty, absent lists are empty, absent references are `None`.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Artwork path prefix; the file name is `{code}.png`
pub const CHARACTER_IMAGE_DIR: &str = "images/characters";

/// Shared placeholder used when character artwork is missing
pub const PLACEHOLDER_IMAGE: &str = "images/ui/card-placeholder.png";

/// Arc slots on a character
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcSlots {
    /// "ex" arc code
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub ex: Option<String>,
    /// "core" arc code
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub core: Option<String>,
}

/// A showcased character (one entry of `characters.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Unique identifier, e.g. "B01"
    #[serde(deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// Reading of the title, used as sort key
    #[serde(default, deserialize_with = "lenient_string")]
    pub title_yomi: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub theme: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub catchcopy: String,
    /// Declared colors; the first non-empty entry is the main color
    #[serde(default, deserialize_with = "lenient_strings")]
    pub colors: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub main_color_label: String,
    /// Series id (key into `series.json`)
    #[serde(default, deserialize_with = "lenient_string")]
    pub series: String,
    #[serde(default, deserialize_with = "lenient_arc_slots")]
    pub arc: ArcSlots,
}

impl Character {
    /// Artwork URL path derived from the code, percent-encoded
    pub fn image_path(&self) -> String {
        format!("{}/{}.png", CHARACTER_IMAGE_DIR, urlencoding::encode(&self.code))
    }

    /// Artwork file relative to the assets directory
    pub fn image_file(&self) -> String {
        format!("{}/{}.png", CHARACTER_IMAGE_DIR, self.code)
    }

    /// Detail page link for this character
    pub fn detail_href(&self) -> String {
        format!("character?code={}", urlencoding::encode(&self.code))
    }

    /// First non-empty declared color
    pub fn main_color(&self) -> Option<&str> {
        self.colors
            .iter()
            .map(|c| c.trim())
            .find(|c| !c.is_empty())
    }

    /// Sort key for reading order: `titleYomi`, falling back to `title`
    pub fn reading(&self) -> &str {
        if self.title_yomi.trim().is_empty() {
            &self.title
        } else {
            &self.title_yomi
        }
    }
}

/// Arc definition (one value of `arcList.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcDefinition {
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub keywords: Vec<String>,
}

impl ArcDefinition {
    /// Display form "{icon} {name}"
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.name).trim().to_string()
    }
}

/// Series (one value of `series.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name_ja: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl Series {
    /// Numeric value of the id, for ordering; non-numeric ids sort last
    pub fn numeric_id(&self) -> u64 {
        self.id.trim().parse().unwrap_or(u64::MAX)
    }
}

/// One gallery link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
    /// Marks the video to embed on the detail page
    #[serde(default)]
    pub embed: bool,
}

/// Per-character links (one value of `links.json`)
///
/// Grouped entries use `music`/`novel`/`video`; older data uses flat
/// `youtube`/`note`/`x` URLs. Both shapes deserialize into this struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    #[serde(default)]
    pub music: Vec<LinkItem>,
    #[serde(default)]
    pub novel: Vec<LinkItem>,
    #[serde(default)]
    pub video: Vec<LinkItem>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub youtube: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub x: Option<String>,
}

impl LinkEntry {
    /// Flat links as (label, url) pairs in fixed order
    pub fn flat_links(&self) -> Vec<(&'static str, &str)> {
        [
            ("YouTube", self.youtube.as_deref()),
            ("note", self.note.as_deref()),
            ("X", self.x.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.map(|u| (label, u)))
        .collect()
    }
}

/// Per-character synopsis (one value of `synopsis.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynopsisEntry {
    /// Newline-separated paragraphs
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub keywords: Vec<String>,
}

impl SynopsisEntry {
    /// Lines of the summary, in order
    pub fn paragraphs(&self) -> Vec<&str> {
        self.summary.split('\n').map(str::trim_end).collect()
    }

    /// First line of the summary, trimmed
    pub fn first_line(&self) -> &str {
        self.summary.split('\n').next().unwrap_or("").trim()
    }
}

/// Official account descriptor (entries of `officialLinks.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialAccount {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub handle: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub desc: String,
}

/// Map-shaped JSON resource that keeps the document's key order
///
/// Arc lists and official link categories are displayed in the order they
/// were written, so a hash map would lose information.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedList<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for KeyedList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> KeyedList<T> {
    pub fn new(entries: Vec<(String, T)>) -> Self {
        Self { entries }
    }

    /// Look up a value by key (first occurrence wins)
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for KeyedList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyedListVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for KeyedListVisitor<T> {
            type Value = KeyedList<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(KeyedList { entries })
            }
        }

        deserializer.deserialize_map(KeyedListVisitor(PhantomData))
    }
}

impl<T: Serialize> Serialize for KeyedList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Everything one page view needs, loaded once
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    /// Characters in source order (the canonical "reset" order)
    pub characters: Vec<Character>,
    pub series: KeyedList<Series>,
    pub arcs: KeyedList<ArcDefinition>,
    pub links: KeyedList<LinkEntry>,
    pub synopsis: KeyedList<SynopsisEntry>,
    pub official_links: KeyedList<Vec<OfficialAccount>>,
}

impl SiteData {
    /// Find a character by code
    pub fn find(&self, code: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.code == code)
    }

    /// Series a character belongs to, if resolvable
    pub fn series_of(&self, character: &Character) -> Option<&Series> {
        self.series.get(&character.series)
    }

    /// (ex, core) arcs of a character, each `None` when unset or unknown
    pub fn arcs_of(
        &self,
        character: &Character,
    ) -> (Option<&ArcDefinition>, Option<&ArcDefinition>) {
        let lookup = |slot: &Option<String>| slot.as_deref().and_then(|code| self.arcs.get(code));
        (lookup(&character.arc.ex), lookup(&character.arc.core))
    }

    pub fn synopsis_of(&self, character: &Character) -> Option<&SynopsisEntry> {
        self.synopsis.get(&character.code)
    }

    pub fn links_of(&self, character: &Character) -> Option<&LinkEntry> {
        self.links.get(&character.code)
    }

    /// Series sorted by numeric id
    pub fn series_by_id(&self) -> Vec<&Series> {
        let mut list: Vec<&Series> = self.series.iter().map(|(_, s)| s).collect();
        list.sort_by_key(|s| s.numeric_id());
        list
    }

    /// Drop characters whose code repeats an earlier one
    ///
    /// Returns the duplicate codes that were removed.
    pub fn dedup_characters(&mut self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dropped = Vec::new();
        self.characters.retain(|c| {
            if seen.insert(c.code.clone()) {
                true
            } else {
                dropped.push(c.code.clone());
                false
            }
        });
        dropped
    }
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// String field that tolerates numbers and null
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(value).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(value).filter(|s| !s.trim().is_empty()))
}

/// String list that tolerates null entries (kept as "") and a null list
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|v| value_to_string(v).unwrap_or_default())
            .collect()),
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s]),
        other => Err(de::Error::custom(format!(
            "expected a list of strings, got {}",
            other
        ))),
    }
}

fn lenient_arc_slots<'de, D>(deserializer: D) -> Result<ArcSlots, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ArcSlots>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
