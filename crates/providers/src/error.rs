//! Error types shared across the provider adapters.

/// Errors from provider HTTP interactions.
///
/// During the polling phase both variants are treated as transient by the
/// engine: a non-2xx status or a transport failure is retried up to the
/// attempt ceiling, never conflated with a provider-reported job failure.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The submission response carried no recognizable request identifier.
    #[error("No request id found in submission response")]
    MissingRequestId,

    /// The adapter was asked to poll but its strategy has no status phase.
    #[error("{0} does not support status polling")]
    PollingUnsupported(&'static str),
}

impl ProviderError {
    /// Read a non-2xx response into an [`ProviderError::Api`] value.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        ProviderError::Api { status, body }
    }
}
