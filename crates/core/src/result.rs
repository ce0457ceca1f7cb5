//! The canonical, provider-agnostic generation result.

use serde::{Deserialize, Serialize};

/// Normalized output of a terminal job. Exactly one variant per job.
///
/// Serialized with an internal `"type"` tag so a canonical result fed back
/// through the normalizer is recognized and returned unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationResult {
    /// A produced video, addressable by URL (remote or `file://`).
    Video { url: String },
    /// A produced image, addressable by URL.
    Image { url: String },
    /// A produced audio clip, addressable by URL.
    Audio { url: String },
    /// Raw binary passthrough whose content type did not map to a media
    /// variant (or that has not yet been spooled to local storage).
    Blob {
        bytes: Vec<u8>,
        mime_type: String,
    },
    /// Opaque JSON fallback for diagnostic display of unrecognized shapes.
    Json { payload: serde_json::Value },
    /// A terminal failure with a stable kind and human-readable message.
    Error { kind: String, message: String },
}

impl GenerationResult {
    /// The produced asset URL, if this is a URL-addressable media variant.
    pub fn media_url(&self) -> Option<&str> {
        match self {
            GenerationResult::Video { url }
            | GenerationResult::Image { url }
            | GenerationResult::Audio { url } => Some(url),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, GenerationResult::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_serializes_with_type_tag() {
        let result = GenerationResult::Video {
            url: "https://x/a.mp4".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["url"], "https://x/a.mp4");
    }

    #[test]
    fn error_round_trips() {
        let result = GenerationResult::Error {
            kind: "provider-reported-failure".into(),
            message: "nsfw content detected".into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: GenerationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn media_url_only_for_media_variants() {
        let video = GenerationResult::Video { url: "u".into() };
        assert_eq!(video.media_url(), Some("u"));
        let json = GenerationResult::Json {
            payload: serde_json::json!({}),
        };
        assert_eq!(json.media_url(), None);
    }
}
