//! The job record and its state-machine invariants.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::inputs::GenerationInputs;
use crate::result::GenerationResult;
use crate::tool::{ModelVariant, ToolId};
use crate::types::{new_job_id, JobId, Timestamp};

/// Lifecycle state of a generation job.
///
/// Transitions are strictly forward along
/// `Idle → Submitting → Processing → {Completed | Failed}`; `Processing`
/// may be skipped for providers that respond synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Idle,
    Submitting,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// `Completed` or `Failed`; no further attempts occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether moving to `next` is a legal forward transition.
    fn allows(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Idle, Submitting)
                | (Submitting, Processing)
                | (Submitting, Completed)
                | (Submitting, Failed)
                | (Processing, Completed)
                | (Processing, Failed)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobStatus::Idle => "Idle",
            JobStatus::Submitting => "Submitting",
            JobStatus::Processing => "Processing",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// One generation attempt from submission to terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub tool: ToolId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelVariant>,
    /// Identifier returned by the remote provider. Required before
    /// polling starts; absent means submission failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_request_id: Option<String>,
    pub status: JobStatus,
    /// Status-check round-trips performed so far.
    pub attempts: u32,
    pub progress_percent: u8,
    /// Immutable snapshot of the submitted parameters.
    pub inputs: GenerationInputs,
    /// Present only in a terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationResult>,
    pub created_at: Timestamp,
}

impl Job {
    /// Create a fresh `Idle` job with a new id and the current time.
    pub fn new(tool: ToolId, model: Option<ModelVariant>, inputs: GenerationInputs) -> Self {
        Self {
            id: new_job_id(),
            tool,
            model,
            provider_request_id: None,
            status: JobStatus::Idle,
            attempts: 0,
            progress_percent: 0,
            inputs,
            result: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Advance the lifecycle state, rejecting backward or repeated moves.
    pub fn advance(&mut self, next: JobStatus) -> Result<(), CoreError> {
        if !self.status.allows(next) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        tracing::debug!(job_id = %self.id, from = %self.status, to = %next, "Job status change");
        self.status = next;
        Ok(())
    }

    /// Record one status-check round-trip. Only legal while `Processing`.
    pub fn record_attempt(&mut self) -> Result<(), CoreError> {
        if self.status != JobStatus::Processing {
            return Err(CoreError::Validation(format!(
                "attempts only increment while Processing (status is {})",
                self.status
            )));
        }
        self.attempts += 1;
        Ok(())
    }

    /// Raise the progress estimate. Decreases are ignored (the estimate is
    /// monotonic); values are clamped to 100.
    pub fn raise_progress(&mut self, percent: u8) {
        let clamped = percent.min(100);
        if clamped > self.progress_percent {
            self.progress_percent = clamped;
        }
    }

    /// Terminate successfully with the normalized result. Sets progress
    /// to exactly 100.
    pub fn complete(&mut self, result: GenerationResult) -> Result<(), CoreError> {
        self.advance(JobStatus::Completed)?;
        self.progress_percent = 100;
        self.result = Some(result);
        Ok(())
    }

    /// Terminate with a failure. Progress stays below 100.
    pub fn fail(&mut self, kind: &str, message: String) -> Result<(), CoreError> {
        self.advance(JobStatus::Failed)?;
        self.result = Some(GenerationResult::Error {
            kind: kind.to_string(),
            message,
        });
        Ok(())
    }
}
