use super::{parse::parse_response, resolver::Resolver, types::VideoInfo};
use crate::{config::ApiConfig, error::LookupError, link::VideoRef};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

/// Metadata lookups through the public tikwm.com API.
pub struct TikwmResolver {
    client: reqwest::Client,
    base_url: Url,
    hd: bool,
}

impl TikwmResolver {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;

        let mut builder = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str());
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            hd: config.hd,
        })
    }

    fn api_url(&self, video_url: &str) -> Result<Url> {
        // Appended rather than joined so a base like `https://mirror/tikwm`
        // keeps its path prefix.
        let mut api_url = self.base_url.clone();
        api_url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .push("api")
            .push("");
        api_url
            .query_pairs_mut()
            .append_pair("url", video_url)
            .append_pair("hd", if self.hd { "1" } else { "0" });
        Ok(api_url)
    }

    async fn fetch(&self, video_url: &str) -> Result<Value> {
        let api_url = self.api_url(video_url)?;
        debug!("Requesting {}", api_url);

        let response = self
            .client
            .get(api_url)
            .send()
            .await
            .context("Failed to reach video API")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "HTTP error! status: {}",
                response.status().as_u16()
            ));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse video API response")?;

        debug!("tikwm API response: {}", body);

        Ok(body)
    }
}

#[async_trait]
impl Resolver for TikwmResolver {
    fn name(&self) -> &'static str {
        "tikwm"
    }

    async fn resolve(&self, url: &str, video_ref: &VideoRef) -> Result<VideoInfo, LookupError> {
        info!("Fetching video information for: {}", url);

        let body = self.fetch(url).await.map_err(LookupError::Network)?;
        parse_response(&body, video_ref, &self.base_url)
    }
}
