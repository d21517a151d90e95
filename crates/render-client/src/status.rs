//! Wire shapes reported by the render service.
//!
//! The service is self-describing JSON; unknown fields are ignored on
//! decode so the service can grow its payloads without breaking older
//! clients.

use serde::Deserialize;

use crate::job::JobEvent;

/// Acknowledgment returned by `POST /upload`.
///
/// A response that decodes but lacks `job_id` is a decode failure; the
/// submission is treated as failed.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub job_id: String,
}

/// Job status reported by `GET /status/{job_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    /// Echoed job id, when the service includes it.
    #[serde(default)]
    pub job_id: Option<String>,

    pub status: ServiceStatus,

    /// Percent complete, `0.0..=100.0`.
    #[serde(default)]
    pub progress: Option<f64>,

    /// Human-readable note from the service.
    #[serde(default)]
    pub message: Option<String>,

    /// Output artifact locator, present once the job is done.
    #[serde(default, alias = "outputUrl")]
    pub output_url: Option<String>,
}

/// Service-side job phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Queued,
    Processing,
    Done,
    Failed,
}

impl StatusResponse {
    /// Whether this report describes a terminal job.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, ServiceStatus::Done | ServiceStatus::Failed)
    }

    /// Map this report onto a job event.
    ///
    /// `queued` and `processing` both count as in-progress. A `done`
    /// report without an explicit locator falls back to the service's
    /// result endpoint for the job.
    pub fn to_event(&self, endpoint_base: &str, job_id: &str) -> JobEvent {
        match self.status {
            ServiceStatus::Queued | ServiceStatus::Processing => JobEvent::Progress {
                percent: self.progress.unwrap_or(0.0),
            },
            ServiceStatus::Done => JobEvent::Completed {
                output_url: self
                    .output_url
                    .clone()
                    .unwrap_or_else(|| format!("{endpoint_base}/result/{job_id}")),
            },
            ServiceStatus::Failed => JobEvent::Failed {
                reason: self
                    .message
                    .clone()
                    .unwrap_or_else(|| "render failed".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_service_status_payload() {
        let json = r#"{
            "job_id": "j1",
            "status": "processing",
            "progress": 40.0,
            "message": "Uploaded. queued for processing",
            "metadata": {"overlays": []}
        }"#;

        let status: StatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(status.status, ServiceStatus::Processing);
        assert_eq!(status.progress, Some(40.0));
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_queued_maps_to_progress_zero() {
        let status: StatusResponse =
            serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        match status.to_event("http://render", "j1") {
            JobEvent::Progress { percent } => assert_eq!(percent, 0.0),
            other => panic!("expected progress event, got {other:?}"),
        }
    }

    #[test]
    fn test_done_without_locator_derives_result_url() {
        let status: StatusResponse =
            serde_json::from_str(r#"{"status": "done", "progress": 100.0}"#).unwrap();
        match status.to_event("http://render", "j1") {
            JobEvent::Completed { output_url } => {
                assert_eq!(output_url, "http://render/result/j1");
            }
            other => panic!("expected completed event, got {other:?}"),
        }
    }

    #[test]
    fn test_done_with_camel_case_locator() {
        let status: StatusResponse = serde_json::from_str(
            r#"{"status": "done", "outputUrl": "http://render/result/j2"}"#,
        )
        .unwrap();
        match status.to_event("http://render", "j2") {
            JobEvent::Completed { output_url } => {
                assert_eq!(output_url, "http://render/result/j2");
            }
            other => panic!("expected completed event, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_carries_service_message() {
        let status: StatusResponse =
            serde_json::from_str(r#"{"status": "failed", "message": "ffmpeg exited 1"}"#)
                .unwrap();
        match status.to_event("http://render", "j1") {
            JobEvent::Failed { reason } => assert_eq!(reason, "ffmpeg exited 1"),
            other => panic!("expected failed event, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_job_id_in_ack_is_a_decode_error() {
        assert!(serde_json::from_str::<SubmitResponse>(r#"{"detail": "oops"}"#).is_err());
    }
}
