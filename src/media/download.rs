use anyhow::{Context, Result};
use futures_util::StreamExt;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::{config::ApiConfig, utils::format_bytes};

/// Streams a video body to disk. The destination only appears once the
/// whole body has been written.
pub struct FileDownloader {
    client: reqwest::Client,
}

impl FileDownloader {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        // No overall deadline, since videos can take a while on slow links,
        // but a stalled connection must not block forever.
        let idle_timeout = std::time::Duration::from_secs(config.timeout_secs);
        let mut builder = reqwest::Client::builder()
            .connect_timeout(idle_timeout)
            .read_timeout(idle_timeout)
            .user_agent(config.user_agent.as_str());
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        let dir = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        debug!("Downloading {} to {}", url, dest.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch video")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to download video: HTTP {}",
                response.status()
            ));
        }

        let tmp = NamedTempFile::new_in(dir).context("Failed to create temporary file")?;
        let mut file = tokio::fs::File::from_std(
            tmp.as_file()
                .try_clone()
                .context("Failed to open temporary file")?,
        );

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read video data")?;
            file.write_all(&chunk)
                .await
                .context("Failed to write video data")?;
            written += chunk.len() as u64;
        }
        file.flush().await.context("Failed to write video data")?;
        drop(file);

        // Temp files are created owner-only; saved videos should not be.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .context("Failed to set video file permissions")?;
        }

        tmp.persist(dest)
            .with_context(|| format!("Failed to save video to {}", dest.display()))?;

        info!("Saved {} to {}", format_bytes(written), dest.display());

        Ok(written)
    }
}
