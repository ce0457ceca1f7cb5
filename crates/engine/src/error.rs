//! Engine-surface error taxonomy.

use neoai_core::error::CoreError;
use neoai_core::tool::{ModelVariant, ToolId};
use neoai_providers::staging::StagingError;

/// Terminal errors surfaced by the engine.
///
/// Transient per-attempt transport errors never appear here -- the poller
/// recovers them internally until the attempt ceiling turns them into
/// [`EngineError::TimeoutExceeded`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A required input was missing. Local check; no network was attempted.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// No adapter is mapped for the `(tool, model)` pair. A static mapping
    /// gap, not a user error.
    #[error("No provider is mapped for tool '{tool}' (model: {model:?})")]
    UnconfiguredTool {
        tool: ToolId,
        model: Option<ModelVariant>,
    },

    /// Staging the input asset failed; no provider call was made.
    #[error("Asset upload failed: {0}")]
    AssetUploadFailed(#[from] StagingError),

    /// The provider rejected the submission or returned no request id.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// The attempt ceiling was reached without a terminal state.
    #[error("Processing timeout: no terminal state after {attempts} status checks")]
    TimeoutExceeded { attempts: u32 },

    /// The provider itself reported the job as failed.
    #[error("Provider reported failure: {0}")]
    ProviderReportedFailure(String),

    /// Another job is already in flight on this engine instance.
    #[error("A generation job is already in flight")]
    Busy,

    /// A job state-machine violation. Indicates a bug in the engine, not
    /// a runtime condition.
    #[error("Job state error: {0}")]
    State(#[from] CoreError),
}

impl EngineError {
    /// Human-readable message recorded in history entries -- the
    /// provider's own words where it supplied any, the error display
    /// otherwise.
    pub fn history_message(&self) -> String {
        match self {
            EngineError::ProviderReportedFailure(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Stable kind string recorded in history entries and canonical
    /// error results.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::ValidationFailed(_) => "validation-failed",
            EngineError::UnconfiguredTool { .. } => "unconfigured-tool",
            EngineError::AssetUploadFailed(_) => "asset-upload-failed",
            EngineError::SubmissionRejected(_) => "submission-rejected",
            EngineError::TimeoutExceeded { .. } => "timeout-exceeded",
            EngineError::ProviderReportedFailure(_) => "provider-reported-failure",
            EngineError::Busy => "busy",
            EngineError::State(_) => "state-error",
        }
    }
}
