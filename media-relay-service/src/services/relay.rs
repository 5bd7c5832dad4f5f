//! The relay pipeline shared by every analyze endpoint.
//!
//! validate → fetch → infer → return text. Each step has its own error
//! variant; the web layer only decides the status code.

use super::fetcher::{FetchError, MediaFetcher};
use super::metrics::{record_media_bytes, record_relay_outcome};
use super::providers::{InferenceProvider, ProviderError};
use crate::config::ModelConfig;
use crate::models::{MediaKind, RelayRequest};
use service_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("Error downloading {kind}: {source}")]
    UpstreamFetch {
        kind: MediaKind,
        #[source]
        source: FetchError,
    },

    #[error("Inference provider error: {0}")]
    Inference(#[from] ProviderError),
}

impl RelayError {
    fn outcome(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "validation_error",
            RelayError::UpstreamFetch { .. } => "fetch_error",
            RelayError::Inference(_) => "inference_error",
        }
    }
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Validation(msg) => AppError::BadRequest(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

/// Stateless relay; clones share the same fetcher and provider.
#[derive(Clone)]
pub struct MediaRelay {
    fetcher: Arc<dyn MediaFetcher>,
    provider: Arc<dyn InferenceProvider>,
    models: ModelConfig,
}

impl MediaRelay {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        provider: Arc<dyn InferenceProvider>,
        models: ModelConfig,
    ) -> Self {
        Self {
            fetcher,
            provider,
            models,
        }
    }

    /// Run the full pipeline for one request and return the provider text untouched.
    pub async fn analyze<R: RelayRequest>(&self, request: &R) -> Result<String, RelayError> {
        let kind = R::KIND;
        let result = self.run(kind, request).await;

        match &result {
            Ok(_) => record_relay_outcome(kind, "success"),
            Err(e) => record_relay_outcome(kind, e.outcome()),
        }

        result
    }

    async fn run<R: RelayRequest>(&self, kind: MediaKind, request: &R) -> Result<String, RelayError> {
        if request.validate().is_err() {
            tracing::warn!(kind = %kind, "Rejected request with missing fields");
            return Err(RelayError::Validation(format!(
                "{} and prompt fields are required.",
                kind.url_field()
            )));
        }

        let media_url = request.media_url();
        let media_location = log_safe_url(media_url);
        tracing::debug!(kind = %kind, media_url = %media_url, "Resolved media url");
        tracing::info!(kind = %kind, media = %media_location, "Downloading media");

        let media = self
            .fetcher
            .fetch(media_url, kind.default_mime_type())
            .await
            .map_err(|source| {
                tracing::error!(kind = %kind, media = %media_location, error = %source, "Media download failed");
                RelayError::UpstreamFetch { kind, source }
            })?;

        record_media_bytes(kind, media.len());
        tracing::info!(
            kind = %kind,
            mime_type = %media.mime_type,
            bytes = media.len(),
            "Download complete"
        );

        let model = self.models.model_for(kind);
        tracing::info!(kind = %kind, model = %model, "Sending analysis request to provider");

        let text = self
            .provider
            .generate(model, request.prompt(), &media)
            .await
            .map_err(|e| {
                tracing::error!(kind = %kind, model = %model, error = %e, "Inference failed");
                RelayError::Inference(e)
            })?;

        tracing::info!(kind = %kind, response_len = text.len(), "Response received");

        Ok(text)
    }

    /// Readiness of the underlying provider.
    pub async fn health_check(&self) -> Result<(), ProviderError> {
        self.provider.health_check().await
    }
}

/// Scheme, host and path only; query strings often carry signed-url tokens.
fn log_safe_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => format!(
            "{}://{}{}",
            parsed.scheme(),
            parsed.host_str().unwrap_or_default(),
            parsed.path()
        ),
        Err(_) => "<unparseable url>".to_string(),
    }
}
