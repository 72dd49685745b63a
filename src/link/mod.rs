//! Recognising TikTok video links and pulling the video id out of them.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::LookupError;

lazy_static! {
    static ref TIKTOK_PATTERNS: [Regex; 3] = [
        Regex::new(r"^https?://(www\.)?tiktok\.com/@[\w.-]+/video/\d+").unwrap(),
        Regex::new(r"^https?://(www\.)?vm\.tiktok\.com/\w+").unwrap(),
        Regex::new(r"^https?://(www\.)?vt\.tiktok\.com/\w+").unwrap(),
    ];
    static ref VIDEO_ID_RE: Regex = Regex::new(r"/video/(\d+)").unwrap();
    static ref SHORT_CODE_RE: Regex = Regex::new(r"v[mt]\.tiktok\.com/(\w+)").unwrap();
}

/// What a link tells us about the video before asking the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoRef {
    /// Numeric id taken from a `/video/<id>` path.
    Id(String),
    /// `vm.`/`vt.tiktok.com` short link. The id is only known after the redirect.
    Shortened(String),
}

impl VideoRef {
    /// Identifier used in fallbacks when the API omits the video id.
    pub fn label(&self) -> &str {
        match self {
            VideoRef::Id(id) => id,
            VideoRef::Shortened(code) => code,
        }
    }
}

pub fn is_valid_tiktok_url(url: &str) -> bool {
    TIKTOK_PATTERNS.iter().any(|pattern| pattern.is_match(url))
}

pub fn extract_video_id(url: &str) -> Option<VideoRef> {
    if url.contains("/video/") {
        return VIDEO_ID_RE
            .captures(url)
            .map(|caps| VideoRef::Id(caps[1].to_string()));
    }

    if url.contains("vm.tiktok.com") || url.contains("vt.tiktok.com") {
        let code = SHORT_CODE_RE
            .captures(url)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();
        return Some(VideoRef::Shortened(code));
    }

    None
}

/// Trims raw user input and checks it looks like a TikTok video link.
pub fn validate_input(raw: &str) -> Result<String, LookupError> {
    let url = raw.trim();

    if url.is_empty() {
        return Err(LookupError::EmptyInput);
    }

    if !is_valid_tiktok_url(url) {
        return Err(LookupError::InvalidUrl);
    }

    Ok(url.to_string())
}
