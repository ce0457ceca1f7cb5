//! The durable history record.

use neoai_core::inputs::GenerationInputs;
use neoai_core::job::{Job, JobStatus};
use neoai_core::result::GenerationResult;
use neoai_core::tool::ToolId;
use neoai_core::types::{JobId, Timestamp};
use serde::{Deserialize, Serialize};

/// Terminal outcome recorded for a job. Only terminal jobs are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordedStatus {
    Completed,
    Failed,
}

/// One immutable history record, created at job termination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: JobId,
    pub tool_id: ToolId,
    pub tool_name: String,
    pub timestamp: Timestamp,
    pub status: RecordedStatus,
    /// Snapshot of the submitted parameters.
    pub inputs: GenerationInputs,
    pub result: GenerationResult,
    /// Staged URL of the binary input, when the job had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_asset_url: Option<String>,
}

impl HistoryEntry {
    /// Build the record for a terminal job. Returns `None` for jobs that
    /// have not reached a terminal state or carry no result.
    pub fn from_job(job: &Job, input_asset_url: Option<String>) -> Option<Self> {
        let status = match job.status {
            JobStatus::Completed => RecordedStatus::Completed,
            JobStatus::Failed => RecordedStatus::Failed,
            _ => return None,
        };
        let result = job.result.clone()?;

        Some(Self {
            id: job.id,
            tool_id: job.tool,
            tool_name: job.tool.display_name().to_string(),
            timestamp: chrono::Utc::now(),
            status,
            inputs: job.inputs.clone(),
            result,
            input_asset_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal_job() -> Job {
        let mut job = Job::new(ToolId::BriefToImages, None, GenerationInputs::empty());
        job.advance(JobStatus::Submitting).unwrap();
        job.complete(GenerationResult::Image {
            url: "https://x/b.png".into(),
        })
        .unwrap();
        job
    }

    #[test]
    fn terminal_job_produces_an_entry() {
        let entry = HistoryEntry::from_job(&terminal_job(), None).unwrap();
        assert_eq!(entry.status, RecordedStatus::Completed);
        assert_eq!(entry.tool_name, "Brief to Images");
    }

    #[test]
    fn non_terminal_job_produces_nothing() {
        let job = Job::new(ToolId::BriefToImages, None, GenerationInputs::empty());
        assert!(HistoryEntry::from_job(&job, None).is_none());
    }
}
