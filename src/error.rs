use thiserror::Error;

use crate::media::Quality;

/// Failures a user can see. `Display` is the exact message shown to them.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Please enter a TikTok video URL")]
    EmptyInput,

    #[error("Please enter a valid TikTok video URL")]
    InvalidUrl,

    /// The API answered but reported a failure; carries its `msg`.
    #[error("{0}")]
    Api(String),

    #[error("Network error. Please check your connection and try again.")]
    Network(#[source] anyhow::Error),

    #[error("Download URL not available")]
    MissingDownloadUrl(Quality),

    #[error("Download failed. Please try again.")]
    DownloadFailed(#[source] anyhow::Error),
}
