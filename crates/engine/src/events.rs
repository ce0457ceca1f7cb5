//! Lifecycle events published by the engine.
//!
//! Broadcast on a [`tokio::sync::broadcast`] channel so a UI layer can
//! render progress without polling the engine.

use neoai_core::tool::ToolId;
use neoai_core::types::JobId;
use serde::Serialize;

/// A job lifecycle event.
#[derive(Debug, Clone, Serialize)]
pub enum EngineEvent {
    /// Submission preconditions passed and the job left `Idle`.
    JobSubmitted { job_id: JobId, tool: ToolId },

    /// The progress estimate or status line changed.
    JobProgress {
        job_id: JobId,
        /// Monotonic estimate in [0, 100].
        percent: u8,
        /// Human-readable status line, when one is available.
        message: Option<String>,
    },

    /// The preflight probe could not verify the target host. Submission
    /// proceeds anyway; this is an early warning, not a failure.
    PreflightUnverified { job_id: JobId, reason: String },

    /// The job reached terminal success.
    JobCompleted { job_id: JobId },

    /// The job reached terminal failure.
    JobFailed { job_id: JobId, error: String },
}
