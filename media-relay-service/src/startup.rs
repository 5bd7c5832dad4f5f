//! Application startup and lifecycle management.
//!
//! Builds the provider and fetcher from configuration, wires them into the
//! router state and serves until a shutdown signal arrives.

use crate::config::RelayConfig;
use crate::handlers::{analyze, health_check, metrics_endpoint, readiness_check};
use crate::models::{AnalyzeAudioRequest, AnalyzeDocumentRequest, AnalyzeImageRequest};
use crate::services::providers::gemini::{GeminiConfig, GeminiProvider};
use crate::services::{HttpMediaFetcher, InferenceProvider, MediaFetcher, MediaRelay};
use axum::{
    body::Body,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{make_request_span, metrics_middleware, request_id_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: MediaRelay,
}

impl AppState {
    pub fn new(relay: MediaRelay) -> Self {
        Self { relay }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze-image", post(analyze::<AnalyzeImageRequest>))
        .route("/analyze-audio", post(analyze::<AnalyzeAudioRequest>))
        .route("/analyze-document", post(analyze::<AnalyzeDocumentRequest>))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let provider: Arc<dyn InferenceProvider> = Arc::new(
            GeminiProvider::new(GeminiConfig {
                api_key: config.gemini.api_key.clone(),
                api_base: config.gemini.api_base.clone(),
                timeout: config.gemini.timeout,
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );

        tracing::info!(
            image_model = %config.models.image_model,
            audio_model = %config.models.audio_model,
            document_model = %config.models.document_model,
            "Initialized Gemini provider"
        );

        let fetcher: Arc<dyn MediaFetcher> = Arc::new(
            HttpMediaFetcher::new(config.fetch.timeout, config.fetch.user_agent.clone())
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );

        let state = AppState::new(MediaRelay::new(fetcher, provider, config.models.clone()));

        // Port 0 = random port for testing
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Media relay service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
