//! Prompt enhancement webhook.
//!
//! A one-shot helper, not a polled job: the prompt goes out as a multipart
//! field and comes back rewritten as a plain-text body.

/// Errors from the enhancement call.
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    /// No enhancement webhook is configured in this deployment.
    #[error("Prompt enhancement is not configured")]
    NotConfigured,

    /// The prompt was empty or whitespace; rejected locally.
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    /// The HTTP request itself failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The webhook returned a non-2xx status code.
    #[error("Enhancement service error ({status})")]
    Api { status: u16 },

    /// The webhook answered 2xx with an empty body.
    #[error("Empty response from enhancement service")]
    EmptyResponse,
}

/// Client for the prompt-enhancement webhook.
pub struct PromptEnhancer {
    client: reqwest::Client,
    webhook_url: String,
}

impl PromptEnhancer {
    pub fn new(client: reqwest::Client, webhook_url: String) -> Self {
        Self {
            client,
            webhook_url,
        }
    }

    /// Rewrite a prompt through the webhook. Returns the trimmed
    /// plain-text replacement.
    pub async fn enhance(&self, prompt: &str) -> Result<String, EnhanceError> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(EnhanceError::EmptyPrompt);
        }

        let form = reqwest::multipart::Form::new().text("prompt", trimmed.to_string());
        let response = self
            .client
            .post(&self.webhook_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnhanceError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let enhanced = body.trim();
        if enhanced.is_empty() {
            return Err(EnhanceError::EmptyResponse);
        }

        tracing::debug!(chars = enhanced.len(), "Prompt enhanced");
        Ok(enhanced.to_string())
    }
}
