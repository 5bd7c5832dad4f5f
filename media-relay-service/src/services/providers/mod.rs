//! Inference provider abstractions and implementations.
//!
//! The relay depends only on [`InferenceProvider`]; the concrete client is
//! built once at startup and injected through the application state.

pub mod gemini;

use crate::models::FetchedMedia;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Content blocked by provider safety filters: {0}")]
    ContentFiltered(String),

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// A multimodal text-generation backend.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Generate text for `prompt` followed by `media`, in that order.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        media: &FetchedMedia,
    ) -> Result<String, ProviderError>;

    /// Cheap readiness check; must not spend provider quota.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
