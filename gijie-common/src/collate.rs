//! Kana-aware collation for reading-order sorting
//!
//! Readings are written in hiragana, katakana or a mix, sometimes with
//! full-width Latin. Comparison runs on three levels:
//! 1. primary: kana folded to unvoiced full-size hiragana, width and case folded
//! 2. secondary: plain < small < voiced < semi-voiced
//! 3. tertiary: hiragana/lowercase < katakana/uppercase

use std::cmp::Ordering;

const SMALL: u8 = 1;
const VOICED: u8 = 2;
const SEMI_VOICED: u8 = 3;

/// Precomputed sort key for one string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<char>,
    secondary: Vec<u8>,
    tertiary: Vec<u8>,
}

/// Build the collation key for a string
pub fn collation_key(s: &str) -> CollationKey {
    let mut primary = Vec::with_capacity(s.len());
    let mut secondary = Vec::with_capacity(s.len());
    let mut tertiary = Vec::with_capacity(s.len());

    for c in s.chars() {
        let (c, case_weight) = fold_width_and_case(c);
        let (c, script_weight) = katakana_to_hiragana(c);
        let (base, mark) = strip_voicing(c);
        primary.push(base);
        secondary.push(mark);
        tertiary.push(case_weight.max(script_weight));
    }

    CollationKey {
        primary,
        secondary,
        tertiary,
    }
}

/// Compare two strings in reading order
pub fn compare(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn fold_width_and_case(c: char) -> (char, u8) {
    let c = match c as u32 {
        // Full-width ASCII variants
        0xFF01..=0xFF5E => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        // Ideographic space
        0x3000 => ' ',
        _ => c,
    };
    if c.is_ascii_uppercase() {
        (c.to_ascii_lowercase(), 1)
    } else {
        (c, 0)
    }
}

fn katakana_to_hiragana(c: char) -> (char, u8) {
    match c as u32 {
        0x30A1..=0x30F6 => (char::from_u32(c as u32 - 0x60).unwrap_or(c), 1),
        _ => (c, 0),
    }
}

fn strip_voicing(c: char) -> (char, u8) {
    let code = c as u32;
    let shifted = |delta: u32, mark: u8| (char::from_u32(code - delta).unwrap_or(c), mark);

    match code {
        // ぁぃぅぇぉ
        0x3041..=0x304A if (code - 0x3041) % 2 == 0 => (char::from_u32(code + 1).unwrap_or(c), SMALL),
        // か..ぢ: unvoiced/voiced pairs
        0x304B..=0x3062 if (code - 0x304B) % 2 == 1 => shifted(1, VOICED),
        // っ
        0x3063 => ('つ', SMALL),
        // つ..ど
        0x3064..=0x3069 if (code - 0x3064) % 2 == 1 => shifted(1, VOICED),
        // は..ぽ: plain/voiced/semi-voiced triples
        0x306F..=0x307D => match (code - 0x306F) % 3 {
            1 => shifted(1, VOICED),
            2 => shifted(2, SEMI_VOICED),
            _ => (c, 0),
        },
        // ゃゅょ
        0x3083 | 0x3085 | 0x3087 => (char::from_u32(code + 1).unwrap_or(c), SMALL),
        // ゎ
        0x308E => ('わ', SMALL),
        // ゔ
        0x3094 => ('う', VOICED),
        _ => (c, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gojuon_order() {
        let mut words = vec!["さくら", "あおい", "かえで", "はな", "いちご"];
        words.sort_by(|a, b| compare(a, b));
        assert_eq!(words, vec!["あおい", "いちご", "かえで", "さくら", "はな"]);
    }

    #[test]
    fn test_katakana_sorts_with_hiragana() {
        assert_eq!(compare("カエデ", "きく"), Ordering::Less);
        assert_eq!(compare("ハナ", "はな"), Ordering::Greater);
        assert_eq!(compare("はな", "ハナ"), Ordering::Less);
    }

    #[test]
    fn test_voiced_after_unvoiced_base() {
        // が sorts next to か, not after こ
        assert_eq!(compare("がっこう", "き"), Ordering::Less);
        assert_eq!(compare("かき", "がき"), Ordering::Less);
        assert_eq!(compare("はは", "ばば"), Ordering::Less);
        assert_eq!(compare("ばば", "ぱぱ"), Ordering::Less);
    }

    #[test]
    fn test_width_and_case_folding() {
        assert_eq!(compare("ａｂｃ", "abd"), Ordering::Less);
        assert_eq!(compare("Apple", "banana"), Ordering::Less);
        assert_eq!(compare("abc", "ABC"), Ordering::Less);
    }

    #[test]
    fn test_equal_strings() {
        assert_eq!(compare("ゆめ", "ゆめ"), Ordering::Equal);
        assert_eq!(compare("", ""), Ordering::Equal);
    }
}
