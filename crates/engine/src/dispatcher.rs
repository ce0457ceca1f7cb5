//! Submission dispatch and job lifecycle.
//!
//! [`GenerationEngine`] holds the static adapter registry, the asset
//! stager, the connectivity probe, the history store, and the artifact
//! spool. [`GenerationEngine::generate`] drives one job from precondition
//! checks through submission, polling, normalization, and the durable
//! history record. At most one job is in flight per engine instance; a
//! second submission is rejected with [`EngineError::Busy`].

use std::sync::Arc;

use neoai_core::inputs::{GenerationInputs, InputAsset};
use neoai_core::job::{Job, JobStatus};
use neoai_core::normalize::normalize;
use neoai_core::tool::{ModelVariant, ToolId};
use neoai_history::{HistoryEntry, HistoryStore};
use neoai_providers::adapter::{SubmitOutcome, SubmitRequest};
use neoai_providers::enhance::{EnhanceError, PromptEnhancer};
use neoai_providers::probe::{ConnectivityProbe, ProbeOutcome};
use neoai_providers::registry::ProviderRegistry;
use neoai_providers::settings::ProviderSettings;
use neoai_providers::staging::{AssetStager, AssetStaging};
use tokio::sync::{broadcast, Mutex};

use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::poller::poll_until_terminal;
use crate::spool::ArtifactSpool;

/// Broadcast channel capacity for lifecycle events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The generation-job orchestrator.
pub struct GenerationEngine {
    settings: ProviderSettings,
    registry: ProviderRegistry,
    stager: Arc<dyn AssetStaging>,
    probe: ConnectivityProbe,
    enhancer: Option<PromptEnhancer>,
    history: HistoryStore,
    spool: ArtifactSpool,
    event_tx: broadcast::Sender<EngineEvent>,
    /// Single-active-job guard; held for the lifetime of one submission.
    active: Mutex<()>,
}

impl GenerationEngine {
    /// Assemble the engine from settings, building the adapter registry,
    /// stager, and probe over one shared HTTP client.
    pub fn new(settings: ProviderSettings, history: HistoryStore, spool: ArtifactSpool) -> Self {
        let client = reqwest::Client::new();
        let registry = ProviderRegistry::from_settings(&settings);
        let stager = Arc::new(AssetStager::new(
            client.clone(),
            settings.asset_upload_url.clone(),
            settings.asset_host_key.clone().unwrap_or_default(),
        ));
        Self::from_parts(settings, registry, stager, history, spool)
    }

    /// Assemble the engine from pre-built parts. Useful when the caller
    /// needs a custom registry or staging implementation.
    pub fn from_parts(
        settings: ProviderSettings,
        registry: ProviderRegistry,
        stager: Arc<dyn AssetStaging>,
        history: HistoryStore,
        spool: ArtifactSpool,
    ) -> Self {
        let client = reqwest::Client::new();
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let enhancer = settings
            .prompt_enhance_url
            .clone()
            .map(|url| PromptEnhancer::new(client.clone(), url));

        Self {
            settings,
            registry,
            stager,
            probe: ConnectivityProbe::new(client),
            enhancer,
            history,
            spool,
            event_tx,
            active: Mutex::new(()),
        }
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// The durable history store.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Run one generation job to its terminal state.
    ///
    /// Preconditions are checked in order -- credentials, required asset,
    /// required prompt -- before any network call; a failing check returns
    /// [`EngineError::ValidationFailed`] with no side effects. Terminal
    /// failures after submission are recorded in history and returned as
    /// the matching [`EngineError`]; terminal success returns the
    /// completed [`Job`].
    pub async fn generate(
        &self,
        tool: ToolId,
        model: Option<ModelVariant>,
        inputs: GenerationInputs,
        asset: Option<InputAsset>,
    ) -> Result<Job, EngineError> {
        let _active = self.active.try_lock().map_err(|_| EngineError::Busy)?;

        self.validate(tool, &inputs, asset.as_ref())?;

        let adapter = self
            .registry
            .select(tool, model)
            .ok_or(EngineError::UnconfiguredTool { tool, model })?;

        let mut job = Job::new(tool, model, inputs);
        job.advance(JobStatus::Submitting)?;
        let _ = self.event_tx.send(EngineEvent::JobSubmitted {
            job_id: job.id,
            tool,
        });
        tracing::info!(job_id = %job.id, tool = %tool, provider = adapter.name(), "Generation submitted");

        if adapter.wants_preflight() {
            if let ProbeOutcome::Unverified(reason) =
                self.probe.preflight(adapter.endpoint_url()).await
            {
                // Early warning only; submission proceeds regardless.
                let _ = self.event_tx.send(EngineEvent::PreflightUnverified {
                    job_id: job.id,
                    reason,
                });
            }
        }

        let mut staged_url = None;
        if tool.requires_staged_asset() {
            let asset_ref = asset
                .as_ref()
                .ok_or_else(|| EngineError::ValidationFailed("An input image is required".into()))?;
            job.raise_progress(10);
            match self.stager.stage(asset_ref).await {
                Ok(url) => {
                    job.raise_progress(30);
                    staged_url = Some(url);
                }
                Err(e) => {
                    return self.fail_job(job, None, EngineError::AssetUploadFailed(e)).await;
                }
            }
        }

        job.raise_progress(40);
        let request = SubmitRequest {
            inputs: &job.inputs,
            asset: asset.as_ref(),
            staged_asset_url: staged_url.as_deref(),
        };
        let outcome = match adapter.submit(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let err = EngineError::SubmissionRejected(e.to_string());
                return self.fail_job(job, staged_url, err).await;
            }
        };

        let payload = match outcome {
            // Synchronous provider: the polling phase is skipped entirely.
            SubmitOutcome::Finished { payload } => payload,
            SubmitOutcome::Accepted { request_id } => {
                job.provider_request_id = Some(request_id.clone());
                job.advance(JobStatus::Processing)?;
                job.raise_progress(50);
                match poll_until_terminal(adapter.as_ref(), &request_id, &mut job, &self.event_tx)
                    .await
                {
                    Ok(payload) => payload,
                    Err(err) => return self.fail_job(job, staged_url, err).await,
                }
            }
        };

        let result = self.spool.materialize(job.id, normalize(&payload)).await;
        job.complete(result)?;
        self.record(&job, staged_url).await;
        let _ = self.event_tx.send(EngineEvent::JobCompleted { job_id: job.id });
        tracing::info!(job_id = %job.id, "Generation complete");
        Ok(job)
    }

    /// Rewrite a prompt through the enhancement webhook.
    pub async fn enhance_prompt(&self, prompt: &str) -> Result<String, EnhanceError> {
        match &self.enhancer {
            Some(enhancer) => enhancer.enhance(prompt).await,
            None => Err(EnhanceError::NotConfigured),
        }
    }

    // ---- private helpers ----

    /// Submission preconditions, checked before any network call.
    fn validate(
        &self,
        tool: ToolId,
        inputs: &GenerationInputs,
        asset: Option<&InputAsset>,
    ) -> Result<(), EngineError> {
        // (1) credentials for the selected provider family
        match tool {
            ToolId::ImageToVideo => {
                if self.settings.queue_api_key.is_none() {
                    return Err(EngineError::ValidationFailed(
                        "Queue provider API key is not configured".into(),
                    ));
                }
                if self.settings.asset_host_key.is_none() {
                    return Err(EngineError::ValidationFailed(
                        "Asset host API key is not configured".into(),
                    ));
                }
            }
            _ => {
                if self.settings.webhook_url_for(tool).is_none() {
                    return Err(EngineError::ValidationFailed(format!(
                        "Tool '{tool}' is not configured"
                    )));
                }
            }
        }

        // (2) required binary input
        if tool.requires_asset() && asset.is_none() {
            return Err(EngineError::ValidationFailed(
                "Please upload an image first".into(),
            ));
        }

        // (3) required textual parameter
        if !has_required_text(inputs) {
            return Err(EngineError::ValidationFailed("Please enter a prompt".into()));
        }

        Ok(())
    }

    /// Terminate the job as failed, record it, and surface the error.
    async fn fail_job(
        &self,
        mut job: Job,
        input_asset_url: Option<String>,
        err: EngineError,
    ) -> Result<Job, EngineError> {
        let message = err.history_message();
        tracing::error!(job_id = %job.id, error = %message, "Generation failed");
        job.fail(err.kind(), message.clone())?;
        self.record(&job, input_asset_url).await;
        let _ = self.event_tx.send(EngineEvent::JobFailed {
            job_id: job.id,
            error: message,
        });
        Err(err)
    }

    /// Append the terminal record. A history write failure is logged, not
    /// propagated -- the job outcome already stands.
    async fn record(&self, job: &Job, input_asset_url: Option<String>) {
        if let Some(entry) = HistoryEntry::from_job(job, input_asset_url) {
            if let Err(e) = self.history.append(entry).await {
                tracing::error!(job_id = %job.id, error = %e, "Failed to record history entry");
            }
        }
    }
}

/// A submission needs at least one non-blank textual parameter: the
/// prompt, or any extra form field for tools whose text inputs travel
/// there.
fn has_required_text(inputs: &GenerationInputs) -> bool {
    inputs.trimmed_prompt().is_some()
        || inputs.extra.values().any(|v| !v.trim().is_empty())
}
