use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Quality {
    Hd,
    Sd,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Hd => "hd",
            Quality::Sd => "sd",
        }
    }

    pub fn file_name(&self) -> String {
        format!("tiktok-video-{}.mp4", self.as_str())
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadUrls {
    pub hd: String,
    pub sd: String,
}

impl DownloadUrls {
    /// Link for `quality`, or `None` when the API gave us nothing usable.
    pub fn get(&self, quality: Quality) -> Option<&str> {
        let url = match quality {
            Quality::Hd => &self.hd,
            Quality::Sd => &self.sd,
        };
        (!url.is_empty()).then_some(url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub author: String,
    pub thumbnail: String,
    pub download_urls: DownloadUrls,
}
