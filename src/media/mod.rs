mod download;
mod parse;
mod resolver;
mod tikwm;
mod types;

#[cfg(test)]
mod test_server;

pub use resolver::Resolver;
pub use types::{DownloadUrls, Quality, VideoInfo};

use crate::{
    config::Config,
    error::LookupError,
    link::{self, VideoRef},
};
use anyhow::Result;
use download::FileDownloader;
use std::path::{Path, PathBuf};
use tikwm::TikwmResolver;
use tracing::{error, info};

pub struct VideoService {
    resolver: Box<dyn Resolver>,
    downloader: FileDownloader,
}

impl VideoService {
    pub fn new(config: &Config) -> Result<Self> {
        let resolver = TikwmResolver::new(&config.api)?;
        Self::with_resolver(Box::new(resolver), config)
    }

    pub fn with_resolver(resolver: Box<dyn Resolver>, config: &Config) -> Result<Self> {
        let downloader = FileDownloader::new(&config.api)?;

        info!("Video service initialized - using {} API", resolver.name());

        Ok(Self {
            resolver,
            downloader,
        })
    }

    /// Validates raw user input and fetches metadata for it.
    pub async fn lookup(&self, raw_input: &str) -> Result<VideoInfo, LookupError> {
        let url = link::validate_input(raw_input)?;

        // Short links like `vm.tiktok.com/video/x` validate without a numeric id.
        let video_ref =
            link::extract_video_id(&url).unwrap_or_else(|| VideoRef::Shortened(String::new()));

        info!("Looking up {} with {}", url, self.resolver.name());

        let info = self.resolver.resolve(&url, &video_ref).await?;
        info!("Resolved video {}: {}", info.id, info.title);

        Ok(info)
    }

    /// Saves the chosen quality as `tiktok-video-<quality>.mp4` in `output_dir`.
    pub async fn download(
        &self,
        info: &VideoInfo,
        quality: Quality,
        output_dir: &Path,
    ) -> Result<PathBuf, LookupError> {
        let url = info
            .download_urls
            .get(quality)
            .ok_or(LookupError::MissingDownloadUrl(quality))?;

        let dest = output_dir.join(quality.file_name());
        info!("{} download started: {}", quality, dest.display());

        match self.downloader.download_to(url, &dest).await {
            Ok(_) => Ok(dest),
            Err(e) => {
                error!("Download error: {:#}", e);
                Err(LookupError::DownloadFailed(e))
            }
        }
    }
}
