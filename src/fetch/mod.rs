//! Document image retrieval
//!
//! Uploaded documents are referenced by URL. A report fetches each one,
//! decodes it into a [`Bitmap`] and embeds it. Every step may fail
//! independently; callers decide whether a failure is fatal.

#[cfg(feature = "http-fetch")]
pub mod http;
pub mod raster;

use async_trait::async_trait;
use base64::Engine;

#[cfg(feature = "http-fetch")]
pub use http::HttpImageFetcher;
pub use raster::{Bitmap, rasterize};

/// Error while fetching or decoding a document image
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
}

/// Source of raw image bytes
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the bytes behind `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Decode a `data:` URI into its payload bytes
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, FetchError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| FetchError::InvalidDataUri("missing 'data:' prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| FetchError::InvalidDataUri("missing ',' separator".to_string()))?;

    if header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| FetchError::InvalidDataUri(e.to_string()))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}
