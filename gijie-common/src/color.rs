//! Color classifier
//!
//! Maps a hex color string to one of nine coarse hue buckets via HSL.
//! Low-saturation, near-black and near-white colors classify as `Mono`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Character;

/// Saturation below this is treated as gray
const MONO_SATURATION_MAX: f64 = 0.12;
/// Lightness below this is treated as black
const MONO_LIGHTNESS_MIN: f64 = 0.08;
/// Lightness above this is treated as white
const MONO_LIGHTNESS_MAX: f64 = 0.92;

/// Hue bucket upper bounds in degrees (exclusive), starting from the red wrap at 10°.
/// Red also covers [345, 360).
const HUE_BUCKETS: [(f64, ColorGroup); 8] = [
    (10.0, ColorGroup::Red),
    (35.0, ColorGroup::Orange),
    (65.0, ColorGroup::Yellow),
    (150.0, ColorGroup::Green),
    (195.0, ColorGroup::Cyan),
    (240.0, ColorGroup::Blue),
    (285.0, ColorGroup::Purple),
    (345.0, ColorGroup::Pink),
];

/// Coarse color group used for color filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorGroup {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
    Mono,
}

impl ColorGroup {
    /// All groups in display order
    pub const ALL: [ColorGroup; 9] = [
        ColorGroup::Red,
        ColorGroup::Orange,
        ColorGroup::Yellow,
        ColorGroup::Green,
        ColorGroup::Cyan,
        ColorGroup::Blue,
        ColorGroup::Purple,
        ColorGroup::Pink,
        ColorGroup::Mono,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorGroup::Red => "red",
            ColorGroup::Orange => "orange",
            ColorGroup::Yellow => "yellow",
            ColorGroup::Green => "green",
            ColorGroup::Cyan => "cyan",
            ColorGroup::Blue => "blue",
            ColorGroup::Purple => "purple",
            ColorGroup::Pink => "pink",
            ColorGroup::Mono => "mono",
        }
    }

    /// Chip label shown on the filter panel
    pub fn label_ja(&self) -> &'static str {
        match self {
            ColorGroup::Red => "赤",
            ColorGroup::Orange => "橙",
            ColorGroup::Yellow => "黄",
            ColorGroup::Green => "緑",
            ColorGroup::Cyan => "水色",
            ColorGroup::Blue => "青",
            ColorGroup::Purple => "紫",
            ColorGroup::Pink => "桃",
            ColorGroup::Mono => "モノクロ",
        }
    }
}

impl fmt::Display for ColorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorGroup {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorGroup::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown color group: {}", s)))
    }
}

/// RGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL color: h in degrees [0, 360), s and l in [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Parse `#rgb`, `#rrggbb`, `rgb` or `rrggbb`
///
/// Returns `None` for any other length or non-hex digits.
pub fn parse_hex(input: &str) -> Option<Rgb> {
    let digits = input.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };

    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

impl Rgb {
    /// Standard max/min channel HSL conversion
    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d == 0.0 {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            ((g - b) / d).rem_euclid(6.0)
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        } * 60.0;

        Hsl {
            h: h.rem_euclid(360.0),
            s,
            l,
        }
    }
}

/// Bucket an HSL color
pub fn classify_hsl(hsl: Hsl) -> ColorGroup {
    if hsl.s < MONO_SATURATION_MAX || hsl.l < MONO_LIGHTNESS_MIN || hsl.l > MONO_LIGHTNESS_MAX {
        return ColorGroup::Mono;
    }

    HUE_BUCKETS
        .iter()
        .find(|(upper, _)| hsl.h < *upper)
        .map(|(_, group)| *group)
        .unwrap_or(ColorGroup::Red)
}

/// Classify a hex color string; `None` when the input is malformed
pub fn classify_hex(input: &str) -> Option<ColorGroup> {
    parse_hex(input).map(|rgb| classify_hsl(rgb.to_hsl()))
}

/// Union of the classifications of all declared colors
///
/// Never empty: no declared colors, or only malformed ones, yields `{Mono}`.
pub fn color_groups_of(character: &Character) -> BTreeSet<ColorGroup> {
    let mut groups: BTreeSet<ColorGroup> = character
        .colors
        .iter()
        .filter_map(|c| classify_hex(c))
        .collect();

    if groups.is_empty() {
        groups.insert(ColorGroup::Mono);
    }
    groups
}
