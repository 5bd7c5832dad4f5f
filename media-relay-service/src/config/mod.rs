use crate::models::MediaKind;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Some media hosts refuse requests that don't look like they come from a browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub models: ModelConfig,
    pub fetch: FetchSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub image_model: String,
    pub audio_model: String,
    pub document_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            image_model: "gemini-1.5-pro-latest".to_string(),
            audio_model: "gemini-1.5-pro".to_string(),
            document_model: "gemini-1.5-pro".to_string(),
        }
    }
}

impl ModelConfig {
    /// Model alias used for the given media kind.
    pub fn model_for(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Image => &self.image_model,
            MediaKind::Audio => &self.audio_model,
            MediaKind::Document => &self.document_model,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";
        let models = ModelConfig::default();

        Ok(RelayConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(get_env("GEMINI_API_KEY", None, is_prod)?),
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
                timeout: Duration::from_secs(parse_secs(
                    "RELAY_INFERENCE_TIMEOUT_SECS",
                    &get_env(
                        "RELAY_INFERENCE_TIMEOUT_SECS",
                        Some(&DEFAULT_INFERENCE_TIMEOUT_SECS.to_string()),
                        is_prod,
                    )?,
                )?),
            },
            models: ModelConfig {
                image_model: get_env("RELAY_IMAGE_MODEL", Some(&models.image_model), is_prod)?,
                audio_model: get_env("RELAY_AUDIO_MODEL", Some(&models.audio_model), is_prod)?,
                document_model: get_env(
                    "RELAY_DOCUMENT_MODEL",
                    Some(&models.document_model),
                    is_prod,
                )?,
            },
            fetch: FetchSettings {
                timeout: Duration::from_secs(parse_secs(
                    "RELAY_FETCH_TIMEOUT_SECS",
                    &get_env(
                        "RELAY_FETCH_TIMEOUT_SECS",
                        Some(&DEFAULT_FETCH_TIMEOUT_SECS.to_string()),
                        is_prod,
                    )?,
                )?),
                user_agent: get_env("RELAY_USER_AGENT", Some(DEFAULT_USER_AGENT), is_prod)?,
            },
        })
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, AppError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be a positive number of seconds, got '{}'",
            key,
            value
        ))),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
