//! Shared test doubles: a scripted provider adapter and a fake asset
//! stager, so engine scenarios run without any network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use neoai_core::inputs::InputAsset;
use neoai_providers::adapter::{
    PollPolicy, ProviderAdapter, StatusVerdict, SubmitOutcome, SubmitRequest,
};
use neoai_providers::error::ProviderError;
use neoai_providers::settings::{ProviderSettings, QueueEndpoints};
use neoai_providers::staging::{AssetStaging, StagingError};

/// Initialize test logging once; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// An adapter that replays a scripted submission outcome and a queue of
/// status verdicts, counting every call.
pub struct ScriptedAdapter {
    submit_outcome: Mutex<Option<Result<SubmitOutcome, ProviderError>>>,
    verdicts: Mutex<VecDeque<Result<StatusVerdict, ProviderError>>>,
    pub submit_calls: AtomicU32,
    pub status_calls: AtomicU32,
    policy: PollPolicy,
}

impl ScriptedAdapter {
    pub fn new(submit_outcome: Result<SubmitOutcome, ProviderError>) -> Self {
        Self {
            submit_outcome: Mutex::new(Some(submit_outcome)),
            verdicts: Mutex::new(VecDeque::new()),
            submit_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            policy: PollPolicy {
                interval: Duration::from_millis(1),
                max_attempts: 120,
            },
        }
    }

    /// A scripted adapter that accepts the submission with `request_id`.
    pub fn accepting(request_id: &str) -> Self {
        Self::new(Ok(SubmitOutcome::Accepted {
            request_id: request_id.into(),
        }))
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.policy.max_attempts = max_attempts;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.policy.interval = interval;
        self
    }

    /// Queue the next status-check result.
    pub fn push_verdict(&self, verdict: Result<StatusVerdict, ProviderError>) {
        self.verdicts.lock().unwrap().push_back(verdict);
    }

    /// Queue `count` transport-level HTTP 500s.
    pub fn push_http_errors(&self, count: u32) {
        let mut verdicts = self.verdicts.lock().unwrap();
        for _ in 0..count {
            verdicts.push_back(Err(ProviderError::Api {
                status: 500,
                body: "internal error".into(),
            }));
        }
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_count(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn name(&self) -> &str {
        "scripted"
    }

    fn endpoint_url(&self) -> &str {
        "http://127.0.0.1:1/webhook/scripted"
    }

    fn poll_policy(&self) -> PollPolicy {
        self.policy
    }

    async fn submit(&self, _request: SubmitRequest<'_>) -> Result<SubmitOutcome, ProviderError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submit_outcome
            .lock()
            .unwrap()
            .take()
            .expect("scripted adapter submitted more than once")
    }

    async fn check_status(&self, _request_id: &str) -> Result<StatusVerdict, ProviderError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.verdicts
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted adapter polled past its script")
    }
}

/// Stager double: hands back a fixed URL or a fixed failure.
pub struct FakeStager {
    url: Option<String>,
    pub calls: AtomicU32,
}

impl FakeStager {
    pub fn succeeding(url: &str) -> Self {
        Self {
            url: Some(url.into()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetStaging for FakeStager {
    async fn stage(&self, _asset: &InputAsset) -> Result<String, StagingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.url {
            Some(url) => Ok(url.clone()),
            None => Err(StagingError::MissingUrl),
        }
    }
}

/// Fully-configured settings for tests; no endpoint is ever contacted.
pub fn test_settings() -> ProviderSettings {
    ProviderSettings {
        queue_api_key: Some("test-queue-key".into()),
        pika: QueueEndpoints {
            submit_url: "http://127.0.0.1:1/pika".into(),
            status_url: "http://127.0.0.1:1/pika/requests".into(),
        },
        kling: QueueEndpoints {
            submit_url: "http://127.0.0.1:1/kling".into(),
            status_url: "http://127.0.0.1:1/kling/requests".into(),
        },
        asset_host_key: Some("test-host-key".into()),
        asset_upload_url: "http://127.0.0.1:1/upload".into(),
        social_media_webhook_url: Some("http://127.0.0.1:1/webhook/social".into()),
        text_to_speech_webhook_url: Some("http://127.0.0.1:1/webhook/tts".into()),
        image_editing_webhook_url: Some("http://127.0.0.1:1/webhook/edit".into()),
        brief_to_images_webhook_url: Some("http://127.0.0.1:1/webhook/brief".into()),
        prompt_enhance_url: None,
    }
}

/// A small PNG-ish input asset.
pub fn test_asset() -> InputAsset {
    InputAsset {
        file_name: "input.png".into(),
        mime_type: "image/png".into(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}
