//! Single-call webhook adapter.
//!
//! The simplest strategy: one multipart POST whose response *is* the
//! terminal payload -- either JSON or raw media bytes (content-type
//! sniffed). There is no polling phase.

use std::time::Duration;

use async_trait::async_trait;
use neoai_core::inputs::InputAsset;
use neoai_core::normalize::RawPayload;
use serde_json::Value;

use crate::adapter::{PollPolicy, ProviderAdapter, StatusVerdict, SubmitOutcome, SubmitRequest};
use crate::error::ProviderError;

/// Adapter for webhook tools that answer in a single round-trip.
pub struct SingleCallWebhookAdapter {
    client: reqwest::Client,
    name: String,
    webhook_url: String,
}

impl SingleCallWebhookAdapter {
    pub fn new(client: reqwest::Client, name: impl Into<String>, webhook_url: String) -> Self {
        Self {
            client,
            name: name.into(),
            webhook_url,
        }
    }
}

#[async_trait]
impl ProviderAdapter for SingleCallWebhookAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn endpoint_url(&self) -> &str {
        &self.webhook_url
    }

    /// No polling phase; the policy is vacuous.
    fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::ZERO,
            max_attempts: 0,
        }
    }

    async fn submit(&self, request: SubmitRequest<'_>) -> Result<SubmitOutcome, ProviderError> {
        let form = multipart_form(&request);

        let response = self
            .client
            .post(&self.webhook_url)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        let payload = read_payload(response).await?;
        tracing::info!(webhook = %self.name, "Webhook answered synchronously");
        Ok(SubmitOutcome::Finished { payload })
    }

    async fn check_status(&self, _request_id: &str) -> Result<StatusVerdict, ProviderError> {
        Err(ProviderError::PollingUnsupported("single-call webhook"))
    }
}

/// Build the multipart body shared by the webhook strategies: the binary
/// asset under `image` (when present) plus every set input as a text
/// field.
pub(crate) fn multipart_form(request: &SubmitRequest<'_>) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();

    if let Some(asset) = request.asset {
        form = form.part("image", asset_part(asset));
    }
    for (name, value) in request.inputs.form_fields() {
        form = form.text(name, value);
    }
    form
}

fn asset_part(asset: &InputAsset) -> reqwest::multipart::Part {
    let part = reqwest::multipart::Part::bytes(asset.bytes.clone())
        .file_name(asset.file_name.clone());
    // An unparseable MIME string falls back to an unlabeled part.
    match part.mime_str(&asset.mime_type) {
        Ok(part) => part,
        Err(_) => reqwest::multipart::Part::bytes(asset.bytes.clone())
            .file_name(asset.file_name.clone()),
    }
}

/// Read a webhook response into a raw payload, sniffing the content type:
/// JSON bodies are parsed, anything else is carried as bytes.
pub(crate) async fn read_payload(response: reqwest::Response) -> Result<RawPayload, ProviderError> {
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    if content_type.contains("application/json") {
        let value: Value = response.json().await?;
        Ok(RawPayload::Json(value))
    } else {
        let bytes = response.bytes().await?;
        Ok(RawPayload::Binary {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
