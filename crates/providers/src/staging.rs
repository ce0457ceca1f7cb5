//! Asset staging: upload a local binary input to a public host.
//!
//! The queue-based providers take image inputs by URL, not by bytes, so
//! the dispatcher stages the user's file to an external image-hosting
//! endpoint first. The hosted URL is only as long-lived as the host
//! guarantees; nothing durable happens here.

use async_trait::async_trait;
use neoai_core::inputs::InputAsset;
use serde_json::Value;

/// Errors from the staging upload.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    /// The HTTP request itself failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host returned a non-2xx status code.
    #[error("Upload rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The host answered 2xx but the success envelope carried no URL.
    #[error("Upload response missing the hosted URL")]
    MissingUrl,
}

/// Seam for the dispatcher: anything that can turn a local asset into a
/// dereferenceable URL.
#[async_trait]
pub trait AssetStaging: Send + Sync {
    async fn stage(&self, asset: &InputAsset) -> Result<String, StagingError>;
}

/// Uploads assets to the configured image-hosting endpoint.
pub struct AssetStager {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl AssetStager {
    pub fn new(client: reqwest::Client, upload_url: String, api_key: String) -> Self {
        Self {
            client,
            upload_url,
            api_key,
        }
    }
}

#[async_trait]
impl AssetStaging for AssetStager {
    /// `POST` multipart `{key, image}`; the success envelope is
    /// `{success: bool, data: {url}}`.
    async fn stage(&self, asset: &InputAsset) -> Result<String, StagingError> {
        let image_part = reqwest::multipart::Part::bytes(asset.bytes.clone())
            .file_name(asset.file_name.clone());
        let form = reqwest::multipart::Form::new()
            .text("key", self.api_key.clone())
            .part("image", image_part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StagingError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        let url = hosted_url(&payload).ok_or(StagingError::MissingUrl)?;

        tracing::info!(url = %url, "Asset staged to public host");
        Ok(url)
    }
}

/// Pull the hosted URL out of a successful upload envelope.
///
/// Requires `success: true` and a non-empty `data.url`.
pub fn hosted_url(payload: &Value) -> Option<String> {
    if payload.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    payload
        .get("data")
        .and_then(|data| data.get("url"))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hosted_url_from_success_envelope() {
        let payload = json!({"success": true, "data": {"url": "https://host/x.png"}});
        assert_eq!(hosted_url(&payload).as_deref(), Some("https://host/x.png"));
    }

    #[test]
    fn success_false_is_rejected_even_with_url() {
        let payload = json!({"success": false, "data": {"url": "https://host/x.png"}});
        assert_eq!(hosted_url(&payload), None);
    }

    #[test]
    fn missing_url_field_is_rejected() {
        assert_eq!(hosted_url(&json!({"success": true, "data": {}})), None);
        assert_eq!(hosted_url(&json!({"success": true})), None);
    }
}
