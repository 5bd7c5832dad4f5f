//! Integration tests for media-relay-service.
//!
//! These spawn the real server on a random port; the media host and the
//! Gemini API are both stood in for by wiremock, except where the exact
//! `User-Agent` bytes matter.

use axum::http::{header::CONTENT_TYPE, header::USER_AGENT, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use media_relay_service::config::{
    FetchSettings, GeminiSettings, ModelConfig, RelayConfig, DEFAULT_USER_AGENT,
};
use media_relay_service::startup::Application;
use reqwest::Client;
use secrecy::Secret;
use serde_json::json;
use service_core::config::Config;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(gemini_base: &str) -> RelayConfig {
    RelayConfig {
        common: Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        gemini: GeminiSettings {
            api_key: Secret::new("test-api-key".to_string()),
            api_base: gemini_base.to_string(),
            timeout: Duration::from_secs(5),
        },
        models: ModelConfig::default(),
        fetch: FetchSettings::default(),
    }
}

/// Spawn the application on a random port and return the port number.
async fn spawn_app(config: RelayConfig) -> u16 {
    let app = Application::build(config)
        .await
        .expect("Failed to build application");

    let port = app.port();

    // Spawn the server in the background
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    port
}

#[tokio::test]
async fn health_check_returns_ok() {
    let port = spawn_app(test_config("http://127.0.0.1:9")).await;
    let client = Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "media-relay-service");
}

#[tokio::test]
async fn readiness_check_returns_ok_with_api_key() {
    let port = spawn_app(test_config("http://127.0.0.1:9")).await;

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/ready", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn readiness_check_fails_without_api_key() {
    let mut config = test_config("http://127.0.0.1:9");
    config.gemini.api_key = Secret::new(String::new());
    let port = spawn_app(config).await;

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/ready", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 503);
}

/// Media host that serves `/a.jpg` only to the default browser User-Agent.
///
/// wiremock 0.5 splits header values on commas, which breaks exact matching
/// of the `(KHTML, like Gecko)` agent string.
async fn spawn_media_host() -> String {
    async fn image(headers: HeaderMap) -> Response {
        match headers.get(USER_AGENT).and_then(|v| v.to_str().ok()) {
            Some(agent) if agent == DEFAULT_USER_AGENT => {
                ([(CONTENT_TYPE, "image/png")], b"\x89PNG".to_vec()).into_response()
            }
            _ => StatusCode::FORBIDDEN.into_response(),
        }
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind media host");
    let address = listener.local_addr().expect("Failed to read media host address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, Router::new().route("/a.jpg", get(image))).await;
    });

    format!("http://{}", address)
}

#[tokio::test]
async fn analyze_image_end_to_end() {
    let media_host = spawn_media_host().await;

    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro-latest:generateContent"))
        .and(header("x-goog-api-key", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "A red apple on a table" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let port = spawn_app(test_config(&gemini.uri())).await;

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/analyze-image", port))
        .json(&json!({
            "image_url": format!("{}/a.jpg", media_host),
            "prompt": "Describe this"
        }))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "response": "A red apple on a table" }));
}

#[tokio::test]
async fn media_host_error_never_reaches_provider() {
    let media_host = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&media_host)
        .await;

    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gemini)
        .await;

    let port = spawn_app(test_config(&gemini.uri())).await;

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/analyze-document", port))
        .json(&json!({
            "doc_url": format!("{}/report.pdf", media_host.uri()),
            "prompt": "Summarize"
        }))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error downloading document"), "{detail}");
    assert!(detail.contains("500"), "{detail}");
}

#[test]
fn config_loads_from_environment() {
    std::env::set_var("ENVIRONMENT", "test");
    std::env::set_var("GEMINI_API_KEY", "env-api-key");
    std::env::set_var("RELAY_FETCH_TIMEOUT_SECS", "7");
    std::env::set_var("RELAY_IMAGE_MODEL", "gemini-2.0-flash");

    let config = RelayConfig::load().expect("Failed to load config");

    assert_eq!(config.fetch.timeout, Duration::from_secs(7));
    assert_eq!(config.models.image_model, "gemini-2.0-flash");
    assert_eq!(config.models.audio_model, "gemini-1.5-pro");
    assert_eq!(
        config.gemini.api_base,
        media_relay_service::config::DEFAULT_GEMINI_API_BASE
    );
}
