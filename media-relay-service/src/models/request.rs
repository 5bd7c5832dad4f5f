//! Request and response bodies for the analyze endpoints.
//!
//! Each endpoint names its URL field differently; [`RelayRequest`] lets the
//! relay pipeline treat them uniformly. Fields default to empty strings so a
//! missing field and an empty one are both rejected by validation rather than
//! by JSON deserialization.

use super::MediaKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub trait RelayRequest: DeserializeOwned + Validate + Send + Sync + 'static {
    const KIND: MediaKind;

    fn media_url(&self) -> &str;

    fn prompt(&self) -> &str;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AnalyzeImageRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "image_url cannot be empty"))]
    pub image_url: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "prompt cannot be empty"))]
    pub prompt: String,
}

impl RelayRequest for AnalyzeImageRequest {
    const KIND: MediaKind = MediaKind::Image;

    fn media_url(&self) -> &str {
        &self.image_url
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AnalyzeAudioRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "audio_url cannot be empty"))]
    pub audio_url: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "prompt cannot be empty"))]
    pub prompt: String,
}

impl RelayRequest for AnalyzeAudioRequest {
    const KIND: MediaKind = MediaKind::Audio;

    fn media_url(&self) -> &str {
        &self.audio_url
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AnalyzeDocumentRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "doc_url cannot be empty"))]
    pub doc_url: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "prompt cannot be empty"))]
    pub prompt: String,
}

impl RelayRequest for AnalyzeDocumentRequest {
    const KIND: MediaKind = MediaKind::Document;

    fn media_url(&self) -> &str {
        &self.doc_url
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Successful analyze response; `response` is the provider text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub response: String,
}
