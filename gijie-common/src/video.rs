//! Video platform identifier extraction
//!
//! Recognizes `youtu.be/<id>`, `youtube.com/watch?v=<id>` and
//! `youtube.com/embed/<id>`, with a pattern match fallback for anything the
//! URL parser rejects or the host checks miss.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

static VIDEO_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:v=|youtu\.be/|embed/)([0-9A-Za-z_-]{6,})").expect("valid video id pattern")
});

/// Embed URL for a video id
pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

/// Extract the video id from a watch, short or embed URL
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    match Url::parse(url) {
        Ok(parsed) => from_parsed(&parsed).or_else(|| from_pattern(url)),
        Err(_) => from_pattern(url),
    }
}

fn from_parsed(url: &Url) -> Option<String> {
    let host = url.host_str().unwrap_or("");

    if host.contains("youtu.be") {
        let id = url.path().trim_start_matches('/');
        let id = id.split('/').next().unwrap_or("");
        return (!id.is_empty()).then(|| id.to_string());
    }

    if host.contains("youtube.com") {
        if let Some((_, v)) = url.query_pairs().find(|(k, v)| k == "v" && !v.is_empty()) {
            return Some(v.into_owned());
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        if let Some(pos) = segments.iter().position(|seg| *seg == "embed") {
            if let Some(id) = segments.get(pos + 1) {
                return Some(id.to_string());
            }
        }
    }

    None
}

fn from_pattern(url: &str) -> Option<String> {
    VIDEO_ID_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_link() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=42"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_link() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123XYZ&list=PL1"),
            Some("abc123XYZ".to_string())
        );
    }

    #[test]
    fn test_embed_link() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/Zz_9-abcdE"),
            Some("Zz_9-abcdE".to_string())
        );
    }

    #[test]
    fn test_pattern_fallback_for_unparseable_url() {
        assert_eq!(
            extract_video_id("youtube.com/watch?v=fallback01"),
            Some("fallback01".to_string())
        );
    }

    #[test]
    fn test_unrecognized_urls() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://example.com/video"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/channel/UC123"), None);
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(embed_url("abc"), "https://www.youtube.com/embed/abc");
    }
}
