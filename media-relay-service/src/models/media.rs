use std::fmt;

/// The kind of media a relay endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Audio,
    Document,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Image, MediaKind::Audio, MediaKind::Document];

    /// Name of the JSON field that carries the media URL.
    pub fn url_field(self) -> &'static str {
        match self {
            MediaKind::Image => "image_url",
            MediaKind::Audio => "audio_url",
            MediaKind::Document => "doc_url",
        }
    }

    /// MIME type used when the media host does not send a `Content-Type`.
    pub fn default_mime_type(self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg",
            // Voice notes forwarded from chat platforms are usually Ogg/Opus.
            MediaKind::Audio => "audio/ogg",
            MediaKind::Document => "application/pdf",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media bytes downloaded for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMedia {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl FetchedMedia {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mime_types_per_kind() {
        assert_eq!(MediaKind::Image.default_mime_type(), "image/jpeg");
        assert_eq!(MediaKind::Audio.default_mime_type(), "audio/ogg");
        assert_eq!(MediaKind::Document.default_mime_type(), "application/pdf");
    }

    #[test]
    fn url_fields_are_distinct() {
        let fields: Vec<_> = MediaKind::ALL.iter().map(|k| k.url_field()).collect();
        assert_eq!(fields, vec!["image_url", "audio_url", "doc_url"]);
    }

    #[test]
    fn display_uses_lowercase_name() {
        assert_eq!(MediaKind::Document.to_string(), "document");
    }
}
