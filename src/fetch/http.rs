//! HTTP image fetcher

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::{FetchError, ImageFetcher, decode_data_uri};
use crate::config::FetchSection;

/// Fetches `http(s)://` URLs with a plain GET and decodes `data:` URIs in
/// place. No credentials or cookies are sent.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Build a fetcher from the `[fetch]` configuration section
    pub fn new(settings: &FetchSection) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.as_str());
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| FetchError::Network {
            url: String::new(),
            message: format!("Failed to build HTTP client: {}", e),
        })?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.starts_with("data:") {
            return decode_data_uri(url);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            let scheme = url.split_once(':').map(|(s, _)| s).unwrap_or(url);
            return Err(FetchError::UnsupportedScheme(scheme.to_string()));
        }

        debug!("Fetching document image {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}
