//! Static adapter registry.
//!
//! Exactly one adapter strategy per `(tool, model)` pair, built once at
//! startup from [`ProviderSettings`]. Call sites select from the registry
//! instead of branching on tool ids.

use std::collections::HashMap;
use std::sync::Arc;

use neoai_core::tool::{ModelVariant, ToolId};

use crate::adapter::ProviderAdapter;
use crate::job_webhook::JobWebhookAdapter;
use crate::queue::QueueProviderAdapter;
use crate::settings::ProviderSettings;
use crate::webhook::SingleCallWebhookAdapter;

/// Lookup table from `(tool, model)` to the owning adapter.
pub struct ProviderRegistry {
    adapters: HashMap<(ToolId, Option<ModelVariant>), Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Empty registry. Used by callers that assemble their own adapters.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Build the full static mapping from settings.
    ///
    /// Entries are only present for tools whose endpoint (and, for the
    /// queue family, credential) is configured; the dispatcher has already
    /// rejected submissions for unconfigured tools by the time it selects.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        let client = reqwest::Client::new();
        let mut registry = Self::new();

        if let Some(key) = &settings.queue_api_key {
            registry.insert(
                ToolId::ImageToVideo,
                Some(ModelVariant::Pika),
                Arc::new(QueueProviderAdapter::new(
                    client.clone(),
                    ModelVariant::Pika,
                    settings.pika.clone(),
                    key.clone(),
                )),
            );
            registry.insert(
                ToolId::ImageToVideo,
                Some(ModelVariant::Kling),
                Arc::new(QueueProviderAdapter::new(
                    client.clone(),
                    ModelVariant::Kling,
                    settings.kling.clone(),
                    key.clone(),
                )),
            );
        }

        if let Some(url) = &settings.social_media_webhook_url {
            registry.insert(
                ToolId::SocialMediaGenerator,
                None,
                Arc::new(SingleCallWebhookAdapter::new(
                    client.clone(),
                    ToolId::SocialMediaGenerator.as_str(),
                    url.clone(),
                )),
            );
        }
        if let Some(url) = &settings.image_editing_webhook_url {
            registry.insert(
                ToolId::ImageEditing,
                None,
                Arc::new(SingleCallWebhookAdapter::new(
                    client.clone(),
                    ToolId::ImageEditing.as_str(),
                    url.clone(),
                )),
            );
        }
        if let Some(url) = &settings.brief_to_images_webhook_url {
            registry.insert(
                ToolId::BriefToImages,
                None,
                Arc::new(SingleCallWebhookAdapter::new(
                    client.clone(),
                    ToolId::BriefToImages.as_str(),
                    url.clone(),
                )),
            );
        }
        if let Some(url) = &settings.text_to_speech_webhook_url {
            registry.insert(
                ToolId::TextToSpeech,
                None,
                Arc::new(JobWebhookAdapter::new(
                    client.clone(),
                    ToolId::TextToSpeech.as_str(),
                    url.clone(),
                )),
            );
        }

        registry
    }

    /// Register (or replace) the adapter for a `(tool, model)` pair.
    pub fn insert(
        &mut self,
        tool: ToolId,
        model: Option<ModelVariant>,
        adapter: Arc<dyn ProviderAdapter>,
    ) {
        self.adapters.insert((tool, model), adapter);
    }

    /// Select the adapter for a `(tool, model)` pair.
    pub fn select(
        &self,
        tool: ToolId,
        model: Option<ModelVariant>,
    ) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&(tool, model)).cloned()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
