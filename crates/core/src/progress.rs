//! Progress estimation for the polling loop.
//!
//! Polling has no real signal for how far along the remote job is, so the
//! estimate is derived from the attempt count. Two ceilings apply: 95 while
//! recovering from transport errors, 90 while the provider reports the job
//! as still pending -- the final 10% is reserved for normalization and
//! display of the completed artifact. 100 is only ever set on terminal
//! success.

/// Ceiling for the estimate while retrying after transport/HTTP errors.
pub const TRANSPORT_PROGRESS_CEILING: u8 = 95;

/// Ceiling for the estimate while the provider reports the job pending.
pub const PENDING_PROGRESS_CEILING: u8 = 90;

fn scaled(attempts: u32, max_attempts: u32, ceiling: u8) -> u8 {
    if max_attempts == 0 {
        return 0;
    }
    let raw = (attempts as f64 / max_attempts as f64) * 100.0;
    (raw as u8).min(ceiling)
}

/// Estimate after a failed status-check round-trip.
pub fn transport_estimate(attempts: u32, max_attempts: u32) -> u8 {
    scaled(attempts, max_attempts, TRANSPORT_PROGRESS_CEILING)
}

/// Estimate while the provider reports the job as still pending.
pub fn pending_estimate(attempts: u32, max_attempts: u32) -> u8 {
    scaled(attempts, max_attempts, PENDING_PROGRESS_CEILING)
}

/// Human-readable status line for a pending poll cycle.
///
/// Uses the provider-supplied message when present, otherwise a generic
/// `(attempt N/max)` line.
pub fn pending_status_line(message: Option<&str>, attempts: u32, max_attempts: u32) -> String {
    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m.to_string(),
        None => format!("Processing... ({attempts}/{max_attempts})"),
    }
}
