use crate::media::{Quality, VideoInfo};
use anyhow::{Context, Result};

const NOT_AVAILABLE: &str = "(not available)";

fn link_or_placeholder(info: &VideoInfo, quality: Quality) -> &str {
    info.download_urls.get(quality).unwrap_or(NOT_AVAILABLE)
}

pub fn render_text(info: &VideoInfo) -> String {
    format!(
        "{title}\n  author:    {author}\n  thumbnail: {thumbnail}\n  HD:        {hd}\n  SD:        {sd}\n",
        title = info.title,
        author = info.author,
        thumbnail = info.thumbnail,
        hd = link_or_placeholder(info, Quality::Hd),
        sd = link_or_placeholder(info, Quality::Sd),
    )
}

pub fn render_json(info: &VideoInfo) -> Result<String> {
    serde_json::to_string_pretty(info).context("Failed to serialize video info")
}

pub fn render_error(err: &dyn std::fmt::Display) -> String {
    format!("Error: {err}")
}
