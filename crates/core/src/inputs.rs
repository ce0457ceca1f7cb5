//! User-supplied generation parameters.
//!
//! An immutable snapshot of these is taken at submission time and carried
//! on the [`Job`](crate::job::Job) and in history records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tool::{ModelVariant, ToolId};

/// Parameters for one generation attempt.
///
/// Named fields cover the structured parameters the queue-based providers
/// consume; `extra` carries arbitrary text fields forwarded verbatim to
/// webhook form bodies (e.g. `image_prompt`, `caption_prompt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Clip length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    /// Pika-specific composition mode (`creative` / `precise`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients_mode: Option<String>,
    /// Kling-specific guidance strength in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    /// Additional text fields passed through to webhook form bodies.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl GenerationInputs {
    /// Empty inputs, all fields unset.
    pub fn empty() -> Self {
        Self {
            prompt: None,
            negative_prompt: None,
            aspect_ratio: None,
            resolution: None,
            duration_secs: None,
            ingredients_mode: None,
            cfg_scale: None,
            extra: BTreeMap::new(),
        }
    }

    /// Workspace defaults for a tool, matching what a fresh session offers.
    pub fn defaults_for(tool: ToolId) -> Self {
        let mut inputs = Self::empty();
        match tool {
            ToolId::ImageToVideo => {
                inputs.prompt = Some(String::new());
                inputs.negative_prompt = Some(String::new());
                inputs.aspect_ratio = Some("1:1".into());
                inputs.resolution = Some("720p".into());
                inputs.duration_secs = Some(5);
                inputs.ingredients_mode = Some("creative".into());
                inputs.cfg_scale = Some(0.5);
            }
            ToolId::BriefToImages => {
                inputs.prompt = Some(String::new());
                inputs.aspect_ratio = Some("1:1".into());
            }
            _ => {}
        }
        inputs
    }

    /// Default model variant for a tool, if it is model-selectable.
    pub fn default_variant(tool: ToolId) -> Option<ModelVariant> {
        match tool {
            ToolId::ImageToVideo => Some(ModelVariant::Pika),
            _ => None,
        }
    }

    /// The prompt with surrounding whitespace stripped, if non-empty.
    ///
    /// Submission validation treats a missing or blank prompt identically.
    pub fn trimmed_prompt(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Flatten into ordered `(name, value)` pairs for a multipart form body.
    ///
    /// Named fields come first, then `extra` in key order. Unset fields are
    /// omitted entirely, mirroring how the original form submission skipped
    /// null entries.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.prompt {
            fields.push(("prompt".to_string(), v.clone()));
        }
        if let Some(v) = &self.negative_prompt {
            fields.push(("negative_prompt".to_string(), v.clone()));
        }
        if let Some(v) = &self.aspect_ratio {
            fields.push(("aspect_ratio".to_string(), v.clone()));
        }
        if let Some(v) = &self.resolution {
            fields.push(("resolution".to_string(), v.clone()));
        }
        if let Some(v) = self.duration_secs {
            fields.push(("duration".to_string(), v.to_string()));
        }
        if let Some(v) = &self.ingredients_mode {
            fields.push(("ingredients_mode".to_string(), v.clone()));
        }
        if let Some(v) = self.cfg_scale {
            fields.push(("cfg_scale".to_string(), v.to_string()));
        }
        for (k, v) in &self.extra {
            fields.push((k.clone(), v.clone()));
        }
        fields
    }
}

/// A local binary input (e.g. the source image for image-to-video).
#[derive(Debug, Clone)]
pub struct InputAsset {
    /// Original file name, used for multipart part naming.
    pub file_name: String,
    /// MIME type reported by the caller (e.g. `image/png`).
    pub mime_type: String,
    pub bytes: Vec<u8>,
}
