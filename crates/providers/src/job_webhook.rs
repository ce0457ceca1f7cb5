//! Job-id webhook adapter.
//!
//! The submission is the same multipart POST as the single-call strategy,
//! but the backend may answer asynchronously: a JSON body carrying
//! `jobId` (or `id`) hands back a pollable job, checked against a status
//! endpoint derived from the submission URL. A binary body or a JSON body
//! without a job id is a synchronous passthrough result.

use std::time::Duration;

use async_trait::async_trait;
use neoai_core::normalize::RawPayload;
use serde_json::Value;

use crate::adapter::{PollPolicy, ProviderAdapter, StatusVerdict, SubmitOutcome, SubmitRequest};
use crate::error::ProviderError;
use crate::webhook::{multipart_form, read_payload};

/// Fixed delay between status checks.
const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Attempt ceiling (2 minutes at 2 s per check).
const MAX_ATTEMPTS: u32 = 60;

/// Adapter for webhook tools with an asynchronous status phase.
pub struct JobWebhookAdapter {
    client: reqwest::Client,
    name: String,
    webhook_url: String,
    status_url: String,
}

impl JobWebhookAdapter {
    pub fn new(client: reqwest::Client, name: impl Into<String>, webhook_url: String) -> Self {
        let status_url = derive_status_url(&webhook_url);
        Self {
            client,
            name: name.into(),
            webhook_url,
            status_url,
        }
    }
}

#[async_trait]
impl ProviderAdapter for JobWebhookAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn endpoint_url(&self) -> &str {
        &self.webhook_url
    }

    fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: POLL_INTERVAL,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// This backend family is deployed on flaky hosting; probe it first.
    fn wants_preflight(&self) -> bool {
        true
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

        match read_payload(response).await? {
            RawPayload::Json(value) => {
                if let Some(job_id) = extract_job_id(&value) {
                    tracing::info!(webhook = %self.name, job_id = %job_id, "Job accepted for processing");
                    return Ok(SubmitOutcome::Accepted { request_id: job_id });
                }
                // `status: processing` without a job id leaves nothing to
                // poll against.
                if value.get("status").and_then(Value::as_str) == Some("processing") {
                    return Err(ProviderError::MissingRequestId);
                }
                Ok(SubmitOutcome::Finished {
                    payload: RawPayload::Json(value),
                })
            }
            binary => Ok(SubmitOutcome::Finished { payload: binary }),
        }
    }

    async fn check_status(&self, request_id: &str) -> Result<StatusVerdict, ProviderError> {
        let response = self
            .client
            .get(&self.status_url)
            .query(&[("jobId", request_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        let payload: Value = response.json().await?;
        Ok(interpret_job_status(&payload))
    }
}

/// Derive the status endpoint from the submission URL by substituting the
/// `/status/` path segment for `/webhook/`.
pub fn derive_status_url(webhook_url: &str) -> String {
    webhook_url.replacen("/webhook/", "/status/", 1)
}

/// Pull the pollable job identifier out of a submission response:
/// `jobId` first, then `id`; numeric ids are stringified.
pub fn extract_job_id(payload: &Value) -> Option<String> {
    ["jobId", "id"].iter().find_map(|field| {
        match payload.get(*field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    })
}

/// Classify one job-status payload.
///
/// `completed` with an attached `result` is terminal success; `failed` is
/// terminal failure with the message from `error`; `processing` and every
/// unrecognized status stay pending (the latter with a status line naming
/// the unknown state).
pub fn interpret_job_status(payload: &Value) -> StatusVerdict {
    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default();

    match status {
        "completed" if payload.get("result").is_some() => StatusVerdict::Succeeded {
            payload: RawPayload::json(payload["result"].clone()),
        },
        "failed" => StatusVerdict::Failed {
            message: payload
                .get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("Processing failed")
                .to_string(),
        },
        "processing" => StatusVerdict::Pending {
            message: payload
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        other => StatusVerdict::Pending {
            message: payload
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| Some(format!("Status: {other}"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn status_url_substitutes_webhook_segment() {
        assert_eq!(
            derive_status_url("https://host.example/webhook/abc-123"),
            "https://host.example/status/abc-123"
        );
    }

    #[test]
    fn status_url_without_webhook_segment_is_unchanged() {
        assert_eq!(
            derive_status_url("https://host.example/hook/abc"),
            "https://host.example/hook/abc"
        );
    }

    #[test]
    fn job_id_prefers_job_id_field() {
        let payload = json!({"jobId": "j-1", "id": "j-2"});
        assert_eq!(extract_job_id(&payload).as_deref(), Some("j-1"));
    }

    #[test]
    fn job_id_falls_back_to_id_and_stringifies_numbers() {
        assert_eq!(extract_job_id(&json!({"id": 42})).as_deref(), Some("42"));
        assert_eq!(extract_job_id(&json!({"done": true})), None);
    }

    #[test]
    fn completed_with_result_is_success() {
        let verdict = interpret_job_status(&json!({
            "status": "completed",
            "result": {"audio_url": "https://x/c.wav"},
        }));
        assert_matches!(verdict, StatusVerdict::Succeeded { .. });
    }

    #[test]
    fn completed_without_result_stays_pending() {
        let verdict = interpret_job_status(&json!({"status": "completed"}));
        assert_matches!(verdict, StatusVerdict::Pending { message: Some(m) } if m == "Status: completed");
    }

    #[test]
    fn failed_uses_error_field() {
        let verdict = interpret_job_status(&json!({"status": "failed", "error": "voice model unavailable"}));
        assert_matches!(verdict, StatusVerdict::Failed { message } if message == "voice model unavailable");
    }

    #[test]
    fn processing_carries_the_provider_message() {
        let verdict = interpret_job_status(&json!({"status": "processing", "message": "synthesizing"}));
        assert_matches!(verdict, StatusVerdict::Pending { message: Some(m) } if m == "synthesizing");
    }
}
