//! Downloads the media referenced by an analyze request.

use crate::models::FetchedMedia;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Error type for media downloads.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("{status} for url: {url}")]
    Status { status: StatusCode, url: String },

    #[error("{0}")]
    Request(String),
}

impl FetchError {
    /// Keep the whole source chain; reqwest's own `Display` stops at
    /// "error sending request" and hides refused connections and timeouts.
    fn from_reqwest(err: reqwest::Error) -> Self {
        FetchError::Request(format!("{:#}", anyhow::Error::new(err)))
    }
}

/// Source of media bytes for the relay pipeline.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch `url`, falling back to `default_mime_type` when the host sends no content type.
    async fn fetch(&self, url: &str, default_mime_type: &str) -> Result<FetchedMedia, FetchError>;
}

/// [`MediaFetcher`] backed by a plain HTTP GET.
pub struct HttpMediaFetcher {
    client: Client,
    user_agent: String,
}

impl HttpMediaFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            user_agent: user_agent.into(),
        })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str, default_mime_type: &str) -> Result<FetchedMedia, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let mime_type = resolve_mime_type(response.headers(), default_mime_type);
        let data = response
            .bytes()
            .await
            .map_err(FetchError::from_reqwest)?;

        Ok(FetchedMedia::new(mime_type, data.to_vec()))
    }
}

/// The response `Content-Type` verbatim if present and readable, else `default`.
pub fn resolve_mime_type(headers: &HeaderMap, default: &str) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}
