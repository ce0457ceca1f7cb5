//! The provider capability trait.
//!
//! One backend family = one strategy object implementing
//! [`ProviderAdapter`]. The engine only ever talks to the trait: it
//! submits, polls, and receives classification verdicts without knowing
//! which family produced a payload. Strategies are selected from the
//! static [`registry`](crate::registry), never by conditional branching at
//! call sites.

use std::time::Duration;

use async_trait::async_trait;
use neoai_core::inputs::{GenerationInputs, InputAsset};
use neoai_core::normalize::RawPayload;

use crate::error::ProviderError;

/// Polling parameters for one provider. Fixed interval, bounded attempts.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

/// Everything an adapter needs to build its submission request.
///
/// `staged_asset_url` is populated by the dispatcher when the tool's input
/// was uploaded to a public host; `asset` carries the raw bytes for
/// adapters that accept multipart uploads directly.
#[derive(Debug, Clone, Copy)]
pub struct SubmitRequest<'a> {
    pub inputs: &'a GenerationInputs,
    pub asset: Option<&'a InputAsset>,
    pub staged_asset_url: Option<&'a str>,
}

/// What a submission call produced.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The provider queued the job; poll with this identifier.
    Accepted { request_id: String },
    /// The provider answered synchronously; no polling phase.
    Finished { payload: RawPayload },
}

/// Classification of one status payload.
///
/// Adapters interpret their own wire shapes into this single verdict so
/// the poller and normalizer never see provider-specific fields.
#[derive(Debug)]
pub enum StatusVerdict {
    /// Still running. `message` is a human-readable status line when the
    /// provider supplied one.
    Pending { message: Option<String> },
    /// Terminal success with the raw result payload.
    Succeeded { payload: RawPayload },
    /// Terminal failure reported by the provider itself.
    Failed { message: String },
}

/// Capability interface over one generation backend.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Short name for logs and error messages.
    fn name(&self) -> &str;

    /// The submission endpoint, used by the connectivity probe.
    fn endpoint_url(&self) -> &str;

    /// Poll interval and attempt ceiling for this provider.
    fn poll_policy(&self) -> PollPolicy;

    /// Whether a best-effort reachability probe should run before
    /// submission. Defaults to off; only known-flaky backends opt in.
    fn wants_preflight(&self) -> bool {
        false
    }

    /// Build and send the provider-specific submission request.
    async fn submit(&self, request: SubmitRequest<'_>) -> Result<SubmitOutcome, ProviderError>;

    /// One status-check round-trip.
    ///
    /// Transport failures and non-2xx responses surface as `Err` and are
    /// retried by the poller; provider-reported outcomes arrive as
    /// [`StatusVerdict`] values.
    async fn check_status(&self, request_id: &str) -> Result<StatusVerdict, ProviderError>;
}
