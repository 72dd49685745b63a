//! Pulls a [`VideoInfo`] out of the loosely-typed JSON the API returns.
//!
//! Nothing about the response shape is trusted: fields may be missing, null,
//! numbers where strings are expected, or objects where a handle is expected.
//! Every field degrades to a fallback instead of failing the lookup.

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::types::{DownloadUrls, VideoInfo};
use crate::{error::LookupError, link::VideoRef};

const DEFAULT_AUTHOR: &str = "@tiktokuser";
const DEFAULT_API_FAILURE: &str = "Failed to fetch video information";

/// String form of a scalar JSON value, or `fallback` for anything else.
pub fn extract_safe_string(value: &Value, fallback: &str) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(_) | Value::Array(_) => {
            warn!("Unexpected object value: {}", value);
            fallback.to_string()
        }
        Value::Null | Value::Bool(_) => fallback.to_string(),
    }
}

/// Like [`extract_safe_string`], but blank strings also take the fallback.
fn string_or(value: &Value, fallback: &str) -> String {
    let s = extract_safe_string(value, fallback);
    if s.is_empty() {
        fallback.to_string()
    } else {
        s
    }
}

fn first_non_empty(values: &[&Value]) -> String {
    values
        .iter()
        .map(|v| extract_safe_string(v, ""))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn extract_author(value: &Value) -> String {
    // The API sends an object here; older mirrors send a plain handle.
    if let Some(handle) = value
        .get("unique_id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return format!("@{handle}");
    }
    string_or(value, DEFAULT_AUTHOR)
}

fn looks_like_video_url(s: &str) -> bool {
    s.contains("http") && (s.contains(".mp4") || s.contains("video"))
}

/// Makes `/path` style links absolute against the API host.
fn absolutize(base: &Url, link: String) -> String {
    if !link.starts_with('/') {
        return link;
    }
    match base.join(&link) {
        Ok(url) => url.to_string(),
        Err(e) => {
            debug!("Could not resolve {} against {}: {}", link, base, e);
            link
        }
    }
}

pub fn parse_response(
    body: &Value,
    video_ref: &VideoRef,
    api_base: &Url,
) -> Result<VideoInfo, LookupError> {
    // `0` and `0.0` both count as success.
    let ok = body.get("code").and_then(Value::as_f64) == Some(0.0);
    let data = match body.get("data") {
        Some(data) if ok && data.is_object() => data,
        _ => {
            let msg = string_or(&body["msg"], DEFAULT_API_FAILURE);
            return Err(LookupError::Api(msg));
        }
    };

    let id = string_or(&data["id"], video_ref.label());
    let title = string_or(&data["title"], &format!("TikTok Video {id}"));
    let author = extract_author(&data["author"]);

    let cover = first_non_empty(&[&data["cover"], &data["thumbnail"]]);
    let thumbnail = if cover.is_empty() {
        format!("https://picsum.photos/300/300?random={id}")
    } else {
        absolutize(api_base, cover)
    };

    let mut hd = first_non_empty(&[&data["hdplay"], &data["play"]]);
    let mut sd = first_non_empty(&[&data["play"], &data["hdplay"]]);

    if hd.is_empty() && sd.is_empty() {
        let candidates = data
            .as_object()
            .into_iter()
            .flat_map(|fields| fields.values())
            .filter_map(Value::as_str)
            .filter(|s| looks_like_video_url(s));

        for candidate in candidates {
            if hd.is_empty() {
                hd = candidate.to_string();
            } else if sd.is_empty() {
                sd = candidate.to_string();
            }
        }
    }

    Ok(VideoInfo {
        id,
        title,
        author,
        thumbnail,
        download_urls: DownloadUrls {
            hd: absolutize(api_base, hd),
            sd: absolutize(api_base, sd),
        },
    })
}
