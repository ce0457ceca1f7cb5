//! The fixed set of generation tools and their model variants.

use serde::{Deserialize, Serialize};

/// A generation capability exposed to the caller.
///
/// The set is closed: every tool maps to exactly one provider strategy in
/// the adapter registry, and an unmapped `(tool, variant)` pair is a
/// programmer error surfaced at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolId {
    /// Image + caption brief in, social media post out (single-call webhook).
    SocialMediaGenerator,
    /// Narration text in, audio out (job-id webhook with polling).
    TextToSpeech,
    /// Still image + motion prompt in, video out (queue-based provider).
    ImageToVideo,
    /// Image + edit prompt in, edited image out (single-call webhook).
    ImageEditing,
    /// Text brief in, images out (single-call webhook).
    BriefToImages,
}

impl ToolId {
    /// Stable identifier used in history records and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::SocialMediaGenerator => "social-media-generator",
            ToolId::TextToSpeech => "text-to-speech",
            ToolId::ImageToVideo => "image-to-video",
            ToolId::ImageEditing => "image-editing",
            ToolId::BriefToImages => "brief-to-images",
        }
    }

    /// Human-readable tool name for history display.
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolId::SocialMediaGenerator => "Social Media Generator",
            ToolId::TextToSpeech => "Text to Speech",
            ToolId::ImageToVideo => "Image to Video",
            ToolId::ImageEditing => "Image Editing",
            ToolId::BriefToImages => "Brief to Images",
        }
    }

    /// Whether the tool cannot run without an uploaded binary input.
    pub fn requires_asset(&self) -> bool {
        matches!(self, ToolId::ImageToVideo)
    }

    /// Whether the provider needs the input staged to a public URL
    /// rather than receiving raw bytes in the request body.
    pub fn requires_staged_asset(&self) -> bool {
        matches!(self, ToolId::ImageToVideo)
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend model selection for tools that offer more than one.
///
/// Only [`ToolId::ImageToVideo`] is model-selectable; both variants share
/// the queue-based polling shape but differ in endpoint and request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    Pika,
    Kling,
}

impl ModelVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::Pika => "pika",
            ModelVariant::Kling => "kling",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_ids_are_stable() {
        assert_eq!(ToolId::ImageToVideo.as_str(), "image-to-video");
        assert_eq!(ToolId::TextToSpeech.as_str(), "text-to-speech");
    }

    #[test]
    fn only_image_to_video_requires_an_asset() {
        assert!(ToolId::ImageToVideo.requires_asset());
        assert!(!ToolId::TextToSpeech.requires_asset());
        assert!(!ToolId::BriefToImages.requires_asset());
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&ToolId::SocialMediaGenerator).unwrap();
        assert_eq!(json, "\"social-media-generator\"");
        let back: ToolId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ToolId::SocialMediaGenerator);
    }
}
