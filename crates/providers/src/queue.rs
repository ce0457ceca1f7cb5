//! Queue-based provider adapter.
//!
//! Covers the hosted queue family (Pika and Kling video backends) that
//! shares one polling shape: a JSON submission returning a request id,
//! then `GET {status_url}/{request_id}` until a terminal status appears.
//! The two backends differ only in endpoint and request body.

use std::time::Duration;

use async_trait::async_trait;
use neoai_core::normalize::RawPayload;
use neoai_core::tool::ModelVariant;
use serde_json::Value;

use crate::adapter::{PollPolicy, ProviderAdapter, StatusVerdict, SubmitOutcome, SubmitRequest};
use crate::error::ProviderError;
use crate::settings::QueueEndpoints;

/// Fixed delay between status checks for the queue family.
const POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Attempt ceiling for the queue family (6 minutes at 3 s per check).
const MAX_ATTEMPTS: u32 = 120;

/// Adapter for one queue-based backend.
pub struct QueueProviderAdapter {
    client: reqwest::Client,
    variant: ModelVariant,
    endpoints: QueueEndpoints,
    api_key: String,
}

impl QueueProviderAdapter {
    pub fn new(
        client: reqwest::Client,
        variant: ModelVariant,
        endpoints: QueueEndpoints,
        api_key: String,
    ) -> Self {
        Self {
            client,
            variant,
            endpoints,
            api_key,
        }
    }

    /// Build the backend-specific submission body.
    ///
    /// Pika takes a list of image URLs plus composition parameters; Kling
    /// takes a single image URL with its duration serialized as a string.
    fn submit_body(&self, request: &SubmitRequest<'_>) -> Value {
        let inputs = request.inputs;
        let image_url = request.staged_asset_url.unwrap_or_default();
        let prompt = inputs.trimmed_prompt().unwrap_or_default();
        let negative = inputs.negative_prompt.clone().unwrap_or_default();
        let duration = inputs.duration_secs.unwrap_or(5);

        match self.variant {
            ModelVariant::Pika => serde_json::json!({
                "image_urls": [image_url],
                "prompt": prompt,
                "negative_prompt": negative,
                "aspect_ratio": inputs.aspect_ratio.clone().unwrap_or_else(|| "1:1".into()),
                "resolution": inputs.resolution.clone().unwrap_or_else(|| "720p".into()),
                "duration": duration,
                "ingredients_mode": inputs
                    .ingredients_mode
                    .clone()
                    .unwrap_or_else(|| "creative".into()),
            }),
            ModelVariant::Kling => serde_json::json!({
                "prompt": prompt,
                "image_url": image_url,
                "duration": duration.to_string(),
                "negative_prompt": negative,
                "cfg_scale": inputs.cfg_scale.unwrap_or(0.5),
            }),
        }
    }
}

#[async_trait]
impl ProviderAdapter for QueueProviderAdapter {
    fn name(&self) -> &str {
        self.variant.as_str()
    }

    fn endpoint_url(&self) -> &str {
        &self.endpoints.submit_url
    }

    fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: POLL_INTERVAL,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    async fn submit(&self, request: SubmitRequest<'_>) -> Result<SubmitOutcome, ProviderError> {
        let body = self.submit_body(&request);

        let response = self
            .client
            .post(&self.endpoints.submit_url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        let payload: Value = response.json().await?;
        let request_id = extract_request_id(&payload).ok_or(ProviderError::MissingRequestId)?;

        tracing::info!(
            backend = self.name(),
            request_id = %request_id,
            "Generation request queued",
        );

        Ok(SubmitOutcome::Accepted { request_id })
    }

    async fn check_status(&self, request_id: &str) -> Result<StatusVerdict, ProviderError> {
        let status_url = format!("{}/{}", self.endpoints.status_url, request_id);

        let response = self
            .client
            .get(&status_url)
            .header("Authorization", format!("Key {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        let payload: Value = response.json().await?;
        Ok(interpret_queue_status(&payload))
    }
}

/// Extract the queue request identifier from a submission response.
///
/// The family is inconsistent about where the id lives; the ordered rule
/// list is `request_id`, `id`, `data.request_id` -- first present wins.
pub fn extract_request_id(payload: &Value) -> Option<String> {
    const ID_PATHS: &[&[&str]] = &[&["request_id"], &["id"], &["data", "request_id"]];
    ID_PATHS
        .iter()
        .filter_map(|path| neoai_core::normalize::lookup(payload, path))
        .filter_map(Value::as_str)
        .find(|id| !id.is_empty())
        .map(str::to_string)
}

/// Classify one queue status payload.
///
/// The job state lives under `status` or `state` and is matched
/// case-insensitively: `completed` is terminal success (the payload itself
/// carries the produced asset URL for the normalizer), `failed` is
/// terminal failure with the message from `error` or `message`, anything
/// else is still pending.
pub fn interpret_queue_status(payload: &Value) -> StatusVerdict {
    let status = payload
        .get("status")
        .or_else(|| payload.get("state"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    if status.eq_ignore_ascii_case("completed") {
        return StatusVerdict::Succeeded {
            payload: RawPayload::json(payload.clone()),
        };
    }

    if status.eq_ignore_ascii_case("failed") {
        let message = payload
            .get("error")
            .or_else(|| payload.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("Processing failed")
            .to_string();
        return StatusVerdict::Failed { message };
    }

    StatusVerdict::Pending {
        message: payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // -- request id extraction, one test per rule --

    #[test]
    fn request_id_from_flat_field() {
        assert_eq!(
            extract_request_id(&json!({"request_id": "abc"})).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn request_id_from_id_field() {
        assert_eq!(extract_request_id(&json!({"id": "abc"})).as_deref(), Some("abc"));
    }

    #[test]
    fn request_id_from_nested_data() {
        assert_eq!(
            extract_request_id(&json!({"data": {"request_id": "abc"}})).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn request_id_prefers_flat_over_nested() {
        let payload = json!({"request_id": "flat", "data": {"request_id": "nested"}});
        assert_eq!(extract_request_id(&payload).as_deref(), Some("flat"));
    }

    #[test]
    fn missing_request_id_everywhere() {
        assert_eq!(extract_request_id(&json!({"queued": true})), None);
        assert_eq!(extract_request_id(&json!({"request_id": ""})), None);
    }

    // -- status interpretation --

    #[test]
    fn completed_is_terminal_success() {
        let verdict = interpret_queue_status(&json!({
            "status": "completed",
            "video_url": "https://x/a.mp4",
        }));
        assert_matches!(verdict, StatusVerdict::Succeeded { .. });
    }

    #[test]
    fn completed_matches_case_insensitively() {
        let verdict = interpret_queue_status(&json!({"status": "COMPLETED"}));
        assert_matches!(verdict, StatusVerdict::Succeeded { .. });
    }

    #[test]
    fn state_field_is_an_alias_for_status() {
        let verdict = interpret_queue_status(&json!({"state": "completed"}));
        assert_matches!(verdict, StatusVerdict::Succeeded { .. });
    }

    #[test]
    fn failed_carries_the_provider_message() {
        let verdict = interpret_queue_status(&json!({
            "status": "FAILED",
            "error": "nsfw content detected",
        }));
        assert_matches!(verdict, StatusVerdict::Failed { message } if message == "nsfw content detected");
    }

    #[test]
    fn failed_without_message_gets_a_generic_one() {
        let verdict = interpret_queue_status(&json!({"status": "failed"}));
        assert_matches!(verdict, StatusVerdict::Failed { message } if message == "Processing failed");
    }

    #[test]
    fn anything_else_is_pending() {
        let verdict = interpret_queue_status(&json!({
            "status": "IN_QUEUE",
            "message": "position 3",
        }));
        assert_matches!(verdict, StatusVerdict::Pending { message: Some(m) } if m == "position 3");
    }

    #[test]
    fn missing_status_is_pending() {
        assert_matches!(
            interpret_queue_status(&json!({})),
            StatusVerdict::Pending { message: None }
        );
    }

    // -- submission bodies --

    fn adapter(variant: ModelVariant) -> QueueProviderAdapter {
        QueueProviderAdapter::new(
            reqwest::Client::new(),
            variant,
            QueueEndpoints {
                submit_url: "https://queue.example/submit".into(),
                status_url: "https://queue.example/requests".into(),
            },
            "test-key".into(),
        )
    }

    #[test]
    fn pika_body_shape() {
        let mut inputs = neoai_core::inputs::GenerationInputs::defaults_for(
            neoai_core::tool::ToolId::ImageToVideo,
        );
        inputs.prompt = Some("make the clouds move".into());
        let request = SubmitRequest {
            inputs: &inputs,
            asset: None,
            staged_asset_url: Some("https://host/x.png"),
        };

        let body = adapter(ModelVariant::Pika).submit_body(&request);
        assert_eq!(body["image_urls"], json!(["https://host/x.png"]));
        assert_eq!(body["prompt"], "make the clouds move");
        assert_eq!(body["resolution"], "720p");
        assert_eq!(body["duration"], 5);
        assert_eq!(body["ingredients_mode"], "creative");
    }

    #[test]
    fn kling_body_serializes_duration_as_string() {
        let mut inputs = neoai_core::inputs::GenerationInputs::defaults_for(
            neoai_core::tool::ToolId::ImageToVideo,
        );
        inputs.prompt = Some("zoom in slowly".into());
        inputs.duration_secs = Some(10);
        let request = SubmitRequest {
            inputs: &inputs,
            asset: None,
            staged_asset_url: Some("https://host/x.png"),
        };

        let body = adapter(ModelVariant::Kling).submit_body(&request);
        assert_eq!(body["image_url"], "https://host/x.png");
        assert_eq!(body["duration"], "10");
        assert_eq!(body["cfg_scale"], 0.5);
        assert!(body.get("image_urls").is_none());
    }
}
