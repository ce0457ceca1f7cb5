//! Best-effort connectivity probe.
//!
//! Some webhook backends are deployed on hosting that silently drops
//! requests when the workflow engine is down. Before submitting to those,
//! the dispatcher runs a lightweight preflight so a warning can be shown
//! early. The probe's contract is "never blocks the caller": every failure
//! is reported as a distinct outcome, and submission proceeds regardless.

use std::time::Duration;

/// What the preflight learned about the target host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Some endpoint answered; the host is up.
    Reachable,
    /// Nothing answered. Submission still proceeds; the reason is only a
    /// diagnostic.
    Unverified(String),
}

/// Per-request timeout. The probe must stay cheap.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Lightweight reachability checker.
pub struct ConnectivityProbe {
    client: reqwest::Client,
}

impl ConnectivityProbe {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Probe the target: an `OPTIONS` request first, then a small set of
    /// derived ping/health endpoints. Any response at all counts as
    /// reachable. Never returns an error.
    pub async fn preflight(&self, target_url: &str) -> ProbeOutcome {
        match self
            .client
            .request(reqwest::Method::OPTIONS, target_url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(_) => return ProbeOutcome::Reachable,
            Err(e) => {
                tracing::debug!(target = %target_url, error = %e, "OPTIONS preflight failed");
            }
        }

        let mut last_error = String::from("no probe endpoint answered");
        for ping_url in ping_candidates(target_url) {
            match self
                .client
                .get(&ping_url)
                .timeout(PROBE_TIMEOUT)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    return ProbeOutcome::Reachable;
                }
                Ok(_) => continue,
                Err(e) => last_error = e.to_string(),
            }
        }

        tracing::warn!(target = %target_url, reason = %last_error, "Preflight could not verify host");
        ProbeOutcome::Unverified(last_error)
    }
}

/// Ping endpoint patterns derived from a webhook URL, tried in order.
pub fn ping_candidates(target_url: &str) -> Vec<String> {
    vec![
        target_url.replacen("/webhook/", "/ping/", 1),
        target_url.replacen("/webhook/", "/health/", 1),
        format!("{target_url}/ping"),
        format!("{target_url}/health"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_candidates_cover_segment_and_suffix_patterns() {
        let candidates = ping_candidates("https://host.example/webhook/abc");
        assert_eq!(
            candidates,
            vec![
                "https://host.example/ping/abc",
                "https://host.example/health/abc",
                "https://host.example/webhook/abc/ping",
                "https://host.example/webhook/abc/health",
            ]
        );
    }

    #[tokio::test]
    async fn unreachable_host_yields_unverified_not_error() {
        let probe = ConnectivityProbe::new(reqwest::Client::new());
        // Port 1 on loopback refuses the connection immediately.
        let outcome = probe.preflight("http://127.0.0.1:1/webhook/x").await;
        assert!(matches!(outcome, ProbeOutcome::Unverified(_)));
    }
}
