//! In-process fetcher and provider doubles for tests.
//!
//! Both count their calls so tests can assert that a step never ran.

use super::fetcher::{FetchError, MediaFetcher};
use super::providers::{InferenceProvider, ProviderError};
use crate::models::FetchedMedia;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What [`MockMediaFetcher`] answers with.
#[derive(Debug, Clone)]
pub enum MockFetch {
    /// Success; `content_type: None` simulates a host that sends no header.
    Media {
        content_type: Option<String>,
        data: Vec<u8>,
    },
    Status(u16),
    NetworkError(String),
}

/// Mock media fetcher for testing.
pub struct MockMediaFetcher {
    outcome: MockFetch,
    calls: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

impl MockMediaFetcher {
    pub fn new(outcome: MockFetch) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    pub fn media(content_type: Option<&str>, data: &[u8]) -> Self {
        Self::new(MockFetch::Media {
            content_type: content_type.map(str::to_string),
            data: data.to_vec(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl MediaFetcher for MockMediaFetcher {
    async fn fetch(&self, url: &str, default_mime_type: &str) -> Result<FetchedMedia, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap_or_else(|e| e.into_inner()) = Some(url.to_string());

        match &self.outcome {
            MockFetch::Media { content_type, data } => Ok(FetchedMedia::new(
                content_type.as_deref().unwrap_or(default_mime_type),
                data.clone(),
            )),
            MockFetch::Status(code) => Err(FetchError::Status {
                status: StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                url: url.to_string(),
            }),
            MockFetch::NetworkError(msg) => Err(FetchError::Request(msg.clone())),
        }
    }
}

/// Arguments of the last [`MockInferenceProvider::generate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInference {
    pub model: String,
    pub prompt: String,
    pub media: FetchedMedia,
}

/// Mock inference provider for testing.
pub struct MockInferenceProvider {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<RecordedInference>>,
}

impl MockInferenceProvider {
    /// Always answers with `text`.
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    /// Always fails with an API error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self::with_reply(Err(message.to_string()))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RecordedInference> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl InferenceProvider for MockInferenceProvider {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        media: &FetchedMedia,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(RecordedInference {
            model: model.to_string(),
            prompt: prompt.to_string(),
            media: media.clone(),
        });

        self.reply.clone().map_err(ProviderError::ApiError)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
