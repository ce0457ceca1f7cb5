//! Bounded status polling.
//!
//! An explicit iterative loop with an owned attempt counter: each cycle
//! performs one `check_status` round-trip, classifies the outcome, and
//! either exits with a terminal payload/error or sleeps the provider's
//! fixed interval and retries. Transport and HTTP errors are transient
//! here -- they are never conflated with a provider-reported job failure
//! and only become terminal when the attempt ceiling is reached.

use neoai_core::job::Job;
use neoai_core::normalize::RawPayload;
use neoai_core::progress;
use neoai_providers::adapter::{ProviderAdapter, StatusVerdict};
use tokio::sync::broadcast;

use crate::error::EngineError;
use crate::events::EngineEvent;

/// Poll until the provider reports a terminal state or the attempt
/// ceiling is reached.
///
/// Returns the raw terminal payload on success. The job's attempt counter
/// and progress estimate are updated on every cycle, and a
/// [`EngineEvent::JobProgress`] is broadcast for each retry.
pub async fn poll_until_terminal(
    adapter: &dyn ProviderAdapter,
    request_id: &str,
    job: &mut Job,
    events: &broadcast::Sender<EngineEvent>,
) -> Result<RawPayload, EngineError> {
    let policy = adapter.poll_policy();
    let mut attempts: u32 = 0;

    loop {
        match adapter.check_status(request_id).await {
            Ok(StatusVerdict::Succeeded { payload }) => {
                tracing::info!(
                    job_id = %job.id,
                    attempts,
                    provider = adapter.name(),
                    "Provider reported completion",
                );
                return Ok(payload);
            }

            Ok(StatusVerdict::Failed { message }) => {
                // Terminal immediately; no further attempts.
                tracing::warn!(
                    job_id = %job.id,
                    attempts,
                    provider = adapter.name(),
                    error = %message,
                    "Provider reported failure",
                );
                return Err(EngineError::ProviderReportedFailure(message));
            }

            Ok(StatusVerdict::Pending { message }) => {
                attempts += 1;
                job.record_attempt()?;
                if attempts >= policy.max_attempts {
                    return Err(EngineError::TimeoutExceeded { attempts });
                }
                job.raise_progress(progress::pending_estimate(attempts, policy.max_attempts));
                let line =
                    progress::pending_status_line(message.as_deref(), attempts, policy.max_attempts);
                publish_progress(events, job, line);
            }

            Err(e) => {
                attempts += 1;
                job.record_attempt()?;
                if attempts >= policy.max_attempts {
                    tracing::warn!(
                        job_id = %job.id,
                        attempts,
                        error = %e,
                        "Attempt ceiling reached without a terminal state",
                    );
                    return Err(EngineError::TimeoutExceeded { attempts });
                }
                job.raise_progress(progress::transport_estimate(attempts, policy.max_attempts));
                tracing::debug!(
                    job_id = %job.id,
                    attempt = attempts,
                    error = %e,
                    "Status check failed, retrying",
                );
                publish_progress(
                    events,
                    job,
                    format!("Checking status... ({attempts}/{})", policy.max_attempts),
                );
            }
        }

        tokio::time::sleep(policy.interval).await;
    }
}

fn publish_progress(events: &broadcast::Sender<EngineEvent>, job: &Job, message: String) {
    let _ = events.send(EngineEvent::JobProgress {
        job_id: job.id,
        percent: job.progress_percent,
        message: Some(message),
    });
}
