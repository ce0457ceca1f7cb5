//! Static provider configuration.
//!
//! Loaded once at process start from environment variables and immutable
//! for the process lifetime. A missing credential is not an error here --
//! the dispatcher surfaces it as a validation failure before any network
//! call for the affected tool.

use neoai_core::tool::ToolId;

/// Submission and status endpoints for one queue-based backend.
#[derive(Debug, Clone)]
pub struct QueueEndpoints {
    pub submit_url: String,
    /// Base URL; the request id is appended as a path segment.
    pub status_url: String,
}

/// All provider endpoints and credentials.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// API key for the queue-based provider family (`Authorization: Key …`).
    pub queue_api_key: Option<String>,
    pub pika: QueueEndpoints,
    pub kling: QueueEndpoints,

    /// API key for the public image-hosting endpoint used by asset staging.
    pub asset_host_key: Option<String>,
    pub asset_upload_url: String,

    /// Per-tool webhook endpoints. Unset means the tool is not configured
    /// in this deployment.
    pub social_media_webhook_url: Option<String>,
    pub text_to_speech_webhook_url: Option<String>,
    pub image_editing_webhook_url: Option<String>,
    pub brief_to_images_webhook_url: Option<String>,

    /// Prompt-enhancement webhook endpoint.
    pub prompt_enhance_url: Option<String>,
}

impl ProviderSettings {
    /// Load settings from environment variables with service defaults.
    ///
    /// | Env Var                            | Default                          |
    /// |------------------------------------|----------------------------------|
    /// | `NEOAI_QUEUE_API_KEY`              | unset                            |
    /// | `NEOAI_PIKA_SUBMIT_URL`            | hosted queue endpoint            |
    /// | `NEOAI_PIKA_STATUS_URL`            | hosted queue status endpoint     |
    /// | `NEOAI_KLING_SUBMIT_URL`           | hosted queue endpoint            |
    /// | `NEOAI_KLING_STATUS_URL`           | hosted queue status endpoint     |
    /// | `NEOAI_ASSET_HOST_KEY`             | unset                            |
    /// | `NEOAI_ASSET_UPLOAD_URL`           | `https://api.imgbb.com/1/upload` |
    /// | `NEOAI_SOCIAL_MEDIA_WEBHOOK_URL`   | unset                            |
    /// | `NEOAI_TEXT_TO_SPEECH_WEBHOOK_URL` | unset                            |
    /// | `NEOAI_IMAGE_EDITING_WEBHOOK_URL`  | unset                            |
    /// | `NEOAI_BRIEF_TO_IMAGES_WEBHOOK_URL`| unset                            |
    /// | `NEOAI_PROMPT_ENHANCE_URL`         | unset                            |
    pub fn from_env() -> Self {
        Self {
            queue_api_key: env_opt("NEOAI_QUEUE_API_KEY"),
            pika: QueueEndpoints {
                submit_url: env_or(
                    "NEOAI_PIKA_SUBMIT_URL",
                    "https://queue.fal.run/fal-ai/pika/v2.2/pikascenes",
                ),
                status_url: env_or(
                    "NEOAI_PIKA_STATUS_URL",
                    "https://queue.fal.run/fal-ai/pika/requests",
                ),
            },
            kling: QueueEndpoints {
                submit_url: env_or(
                    "NEOAI_KLING_SUBMIT_URL",
                    "https://queue.fal.run/fal-ai/kling-video/v2.5-turbo/pro/image-to-video",
                ),
                status_url: env_or(
                    "NEOAI_KLING_STATUS_URL",
                    "https://queue.fal.run/fal-ai/kling-video/requests",
                ),
            },
            asset_host_key: env_opt("NEOAI_ASSET_HOST_KEY"),
            asset_upload_url: env_or("NEOAI_ASSET_UPLOAD_URL", "https://api.imgbb.com/1/upload"),
            social_media_webhook_url: env_opt("NEOAI_SOCIAL_MEDIA_WEBHOOK_URL"),
            text_to_speech_webhook_url: env_opt("NEOAI_TEXT_TO_SPEECH_WEBHOOK_URL"),
            image_editing_webhook_url: env_opt("NEOAI_IMAGE_EDITING_WEBHOOK_URL"),
            brief_to_images_webhook_url: env_opt("NEOAI_BRIEF_TO_IMAGES_WEBHOOK_URL"),
            prompt_enhance_url: env_opt("NEOAI_PROMPT_ENHANCE_URL"),
        }
    }

    /// Load a `.env` file if present, then read settings from the
    /// environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// The configured webhook URL for a webhook-backed tool.
    pub fn webhook_url_for(&self, tool: ToolId) -> Option<&str> {
        match tool {
            ToolId::SocialMediaGenerator => self.social_media_webhook_url.as_deref(),
            ToolId::TextToSpeech => self.text_to_speech_webhook_url.as_deref(),
            ToolId::ImageEditing => self.image_editing_webhook_url.as_deref(),
            ToolId::BriefToImages => self.brief_to_images_webhook_url.as_deref(),
            ToolId::ImageToVideo => None,
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}
