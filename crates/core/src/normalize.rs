//! Terminal-payload normalization.
//!
//! Providers return wildly different shapes for the same logical outcome.
//! [`normalize`] maps any raw terminal payload into one canonical
//! [`GenerationResult`]. The mapping never fails: an unrecognized shape
//! degrades to the opaque [`GenerationResult::Json`] fallback rather than
//! failing the job.
//!
//! URL extraction is driven by explicit ordered rule tables (first present
//! field path wins) instead of ad hoc optional-chaining, so each rule can
//! be tested on its own.

use serde_json::Value;

use crate::result::GenerationResult;

/// A raw terminal payload as it left the provider.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Json(Value),
    /// A binary response body plus the `Content-Type` it arrived with.
    Binary {
        bytes: Vec<u8>,
        content_type: String,
    },
}

impl RawPayload {
    /// Wrap a JSON value.
    pub fn json(value: Value) -> Self {
        RawPayload::Json(value)
    }
}

/// Ordered field paths tried when looking for a produced video URL.
///
/// Covers the flat and `data`-nested variants observed across the
/// queue-provider family.
pub const VIDEO_URL_PATHS: &[&[&str]] = &[
    &["video", "url"],
    &["video_url"],
    &["data", "video", "url"],
    &["data", "video_url"],
];

/// Ordered field paths tried when looking for a produced image URL.
pub const IMAGE_URL_PATHS: &[&[&str]] = &[
    &["image", "url"],
    &["image_url"],
    &["data", "image", "url"],
    &["data", "image_url"],
];

/// Ordered field paths tried when looking for a produced audio URL.
pub const AUDIO_URL_PATHS: &[&[&str]] = &[
    &["audio", "url"],
    &["audio_url"],
    &["data", "audio", "url"],
    &["data", "audio_url"],
];

/// Walk a dotted field path into a JSON value.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Try an ordered rule list; the first path resolving to a non-empty
/// string wins.
pub fn extract_url<'a>(value: &'a Value, paths: &[&[&str]]) -> Option<&'a str> {
    paths
        .iter()
        .filter_map(|path| lookup(value, path))
        .filter_map(Value::as_str)
        .find(|url| !url.is_empty())
}

/// Map a raw terminal payload into the canonical result.
///
/// Classification order, first match wins:
/// 1. an already-canonical tagged result is returned unchanged,
/// 2. an explicit error envelope (`error` field present),
/// 3. a populated video URL field,
/// 4. an image URL field,
/// 5. an audio URL field,
/// 6. a binary body (the engine's artifact spool later upgrades media
///    content types to the matching typed variant),
/// 7. the opaque JSON fallback.
pub fn normalize(payload: &RawPayload) -> GenerationResult {
    let value = match payload {
        RawPayload::Binary { bytes, content_type } => {
            return GenerationResult::Blob {
                bytes: bytes.clone(),
                mime_type: content_type.clone(),
            };
        }
        RawPayload::Json(value) => value,
    };

    if let Some(canonical) = as_canonical(value) {
        return canonical;
    }

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let kind = error
            .as_str()
            .filter(|s| !s.is_empty())
            .unwrap_or("Generation Failed")
            .to_string();
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("Processing failed")
            .to_string();
        return GenerationResult::Error { kind, message };
    }

    if let Some(url) = extract_url(value, VIDEO_URL_PATHS) {
        return GenerationResult::Video { url: url.to_string() };
    }
    if let Some(url) = extract_url(value, IMAGE_URL_PATHS) {
        return GenerationResult::Image { url: url.to_string() };
    }
    if let Some(url) = extract_url(value, AUDIO_URL_PATHS) {
        return GenerationResult::Audio { url: url.to_string() };
    }

    GenerationResult::Json {
        payload: value.clone(),
    }
}

/// Recognize an already-normalized result by its `"type"` tag.
///
/// Only the closed set of canonical tags is accepted, so provider payloads
/// that happen to carry a `type` field (e.g. a MIME type string) are not
/// misclassified.
fn as_canonical(value: &Value) -> Option<GenerationResult> {
    const CANONICAL_TAGS: &[&str] = &["video", "image", "audio", "blob", "json", "error"];
    let tag = value.get("type")?.as_str()?;
    if !CANONICAL_TAGS.contains(&tag) {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}
