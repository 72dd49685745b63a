use super::types::VideoInfo;
use crate::{error::LookupError, link::VideoRef};
use async_trait::async_trait;

#[async_trait]
pub trait Resolver: Send + Sync {
    /// Human-readable name of the metadata source
    fn name(&self) -> &'static str;

    /// Look up metadata and download links for a validated video URL
    async fn resolve(&self, url: &str, video_ref: &VideoRef) -> Result<VideoInfo, LookupError>;
}
