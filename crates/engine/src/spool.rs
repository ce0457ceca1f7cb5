//! Artifact spool for binary passthrough results.
//!
//! Single-call webhooks sometimes answer with raw media bytes instead of
//! a URL. The spool writes those bytes to a local directory and upgrades
//! the [`GenerationResult::Blob`] into the matching typed variant with a
//! `file://` URL, so downstream consumers handle every media result the
//! same way. Blobs with non-media content types stay blobs.

use std::path::PathBuf;

use neoai_core::result::GenerationResult;
use neoai_core::types::JobId;

/// Writes binary results to a local spool directory.
pub struct ArtifactSpool {
    dir: PathBuf,
}

/// Media families the spool upgrades to typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Video,
    Image,
    Audio,
}

impl ArtifactSpool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Upgrade a binary result to a typed variant backed by a local file.
    ///
    /// Non-blob results pass through untouched. A write failure keeps the
    /// blob in memory rather than failing the job.
    pub async fn materialize(&self, job_id: JobId, result: GenerationResult) -> GenerationResult {
        let GenerationResult::Blob { bytes, mime_type } = result else {
            return result;
        };

        let Some(kind) = media_kind(&mime_type) else {
            return GenerationResult::Blob { bytes, mime_type };
        };

        match self.write(job_id, &bytes, &mime_type).await {
            Ok(url) => {
                tracing::info!(job_id = %job_id, url = %url, "Artifact spooled to local file");
                match kind {
                    MediaKind::Video => GenerationResult::Video { url },
                    MediaKind::Image => GenerationResult::Image { url },
                    MediaKind::Audio => GenerationResult::Audio { url },
                }
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Artifact spool write failed");
                GenerationResult::Blob { bytes, mime_type }
            }
        }
    }

    async fn write(&self, job_id: JobId, bytes: &[u8], mime_type: &str) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self
            .dir
            .join(format!("{job_id}.{}", extension_for(mime_type)));
        tokio::fs::write(&path, bytes).await?;
        Ok(format!("file://{}", path.display()))
    }
}

fn media_kind(mime_type: &str) -> Option<MediaKind> {
    if mime_type.starts_with("video/") {
        Some(MediaKind::Video)
    } else if mime_type.starts_with("image/") {
        Some(MediaKind::Image)
    } else if mime_type.starts_with("audio/") {
        Some(MediaKind::Audio)
    } else {
        None
    }
}

/// File extension derived from a MIME subtype, with parameters and
/// structured-syntax suffixes stripped (`video/mp4; codecs=...` -> `mp4`).
fn extension_for(mime_type: &str) -> &str {
    mime_type
        .split('/')
        .nth(1)
        .map(|subtype| {
            let subtype = subtype.split(';').next().unwrap_or(subtype).trim();
            subtype.split('+').next().unwrap_or(subtype)
        })
        .filter(|ext| !ext.is_empty())
        .unwrap_or("bin")
}
