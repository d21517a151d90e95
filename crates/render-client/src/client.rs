//! HTTP client for the render service.
//!
//! Submission is a single multipart `POST /upload` carrying the video
//! bytes and the serialized composition; there are no automatic submit
//! retries, a failed submission is surfaced and resubmission is a fresh
//! user action. Status tracking polls `GET /status/{job_id}` and treats
//! transport faults as transient, reconnecting with linear backoff up
//! to a configured bound.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use overcut_common::config::RenderServiceConfig;
use overcut_common::error::{OvercutError, OvercutResult};
use overcut_overlay_model::CompositionDescription;
use tokio::sync::mpsc;

use crate::job::JobEvent;
use crate::status::{StatusResponse, SubmitResponse};

/// Multipart field carrying the video bytes.
const VIDEO_PART_NAME: &str = "file";
const VIDEO_PART_FILENAME: &str = "video.mp4";
const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Multipart field carrying the serialized composition.
const COMPOSITION_PART_NAME: &str = "overlays";
const COMPOSITION_CONTENT_TYPE: &str = "application/json";

/// Client for one render service endpoint. Cheap to clone; clones share
/// the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RenderClient {
    http: reqwest::Client,
    config: RenderServiceConfig,
}

impl RenderClient {
    /// Build a client for the configured service.
    pub fn new(config: RenderServiceConfig) -> OvercutResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| OvercutError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RenderServiceConfig {
        &self.config
    }

    /// Submit a video plus composition, returning the assigned job id.
    ///
    /// The composition is serialized here, before the request leaves;
    /// later edits to the store cannot affect this job. No
    /// acknowledgment within the submit timeout is a transport failure.
    pub async fn submit(
        &self,
        video_path: &Path,
        composition: &CompositionDescription,
    ) -> OvercutResult<String> {
        let overlays_json = composition.to_json()?;
        let video_bytes = tokio::fs::read(video_path).await?;

        tracing::info!(
            video = %video_path.display(),
            video_bytes = video_bytes.len(),
            overlays = composition.overlays.len(),
            "Submitting render job"
        );

        let video_part = reqwest::multipart::Part::bytes(video_bytes)
            .file_name(VIDEO_PART_FILENAME)
            .mime_str(VIDEO_CONTENT_TYPE)
            .map_err(|e| OvercutError::transport(format!("invalid video content type: {e}")))?;
        let overlays_part = reqwest::multipart::Part::text(overlays_json)
            .mime_str(COMPOSITION_CONTENT_TYPE)
            .map_err(|e| {
                OvercutError::transport(format!("invalid composition content type: {e}"))
            })?;
        let form = reqwest::multipart::Form::new()
            .part(VIDEO_PART_NAME, video_part)
            .part(COMPOSITION_PART_NAME, overlays_part);

        let response = self
            .http
            .post(format!("{}/upload", self.config.endpoint_base()))
            .timeout(Duration::from_secs(self.config.submit_timeout_secs))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OvercutError::transport("submit timed out waiting for acknowledgment")
                } else {
                    OvercutError::transport(format!("submit failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(OvercutError::transport(format!(
                "render service returned {}",
                response.status()
            )));
        }

        let ack: SubmitResponse = response
            .json()
            .await
            .map_err(|e| OvercutError::decode(format!("submit response missing job_id: {e}")))?;

        tracing::info!(job_id = %ack.job_id, "Render job acknowledged");
        Ok(ack.job_id)
    }

    /// Fetch one status report for a job.
    pub async fn fetch_status(&self, job_id: &str) -> OvercutResult<StatusResponse> {
        let response = self
            .http
            .get(format!("{}/status/{job_id}", self.config.endpoint_base()))
            .timeout(Duration::from_secs(self.config.idle_timeout_secs))
            .send()
            .await
            .map_err(|e| OvercutError::transport(format!("status poll failed: {e}")))?;

        if !response.status().is_success() {
            return Err(OvercutError::transport(format!(
                "status endpoint returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| OvercutError::decode(format!("malformed status payload: {e}")))
    }

    /// Poll a job's status until it reaches a terminal state, sending
    /// each report as a `JobEvent`.
    ///
    /// Transient faults reconnect with linear backoff; after
    /// `max_reconnect_attempts` consecutive failures the job is reported
    /// failed as unreachable. Raising `stop`, or dropping the event
    /// receiver, abandons tracking without touching the server-side job.
    pub async fn track(
        &self,
        job_id: &str,
        stop: Arc<AtomicBool>,
        events: &mpsc::UnboundedSender<JobEvent>,
    ) -> OvercutResult<()> {
        let mut attempts: u32 = 0;

        loop {
            if stop.load(Ordering::SeqCst) {
                tracing::info!(job_id, "Abandoned job status tracking");
                return Ok(());
            }

            match self.fetch_status(job_id).await {
                Ok(status) => {
                    attempts = 0;
                    let event = status.to_event(self.config.endpoint_base(), job_id);
                    let terminal = status.is_terminal();
                    if events.send(event).is_err() {
                        tracing::info!(job_id, "Job event receiver dropped; abandoning tracking");
                        return Ok(());
                    }
                    if terminal {
                        tracing::info!(job_id, "Job reached terminal state");
                        return Ok(());
                    }
                }
                Err(e) => {
                    attempts += 1;
                    if attempts >= self.config.max_reconnect_attempts {
                        tracing::warn!(
                            job_id,
                            attempts,
                            error = %e,
                            "Reconnect budget exhausted; marking job unreachable"
                        );
                        let _ = events.send(JobEvent::Failed {
                            reason: "render service unreachable".to_string(),
                        });
                        return Err(e);
                    }
                    tracing::warn!(
                        job_id,
                        attempt = attempts,
                        error = %e,
                        "Status poll failed; reconnecting"
                    );
                }
            }

            let backoff_ms = self.config.poll_interval_ms * (attempts as u64 + 1);
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
        }
    }
}
