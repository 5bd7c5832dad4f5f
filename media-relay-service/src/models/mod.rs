//! Domain models for the media relay service.

pub mod media;
pub mod request;

pub use media::{FetchedMedia, MediaKind};
pub use request::{
    AnalyzeAudioRequest, AnalyzeDocumentRequest, AnalyzeImageRequest, AnalyzeResponse,
    RelayRequest,
};
