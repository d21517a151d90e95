//! Render job value object and state machine.
//!
//! A job moves monotonically through
//! `NotStarted -> Submitting -> InProgress -> Completed | Failed`.
//! Terminal states stick until a fresh submission replaces the job
//! wholesale. Event-driven transitions that do not match the current
//! state are logged and dropped, never applied; displayed progress
//! never moves backward within one job.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use overcut_common::error::{OvercutError, OvercutResult};
use overcut_overlay_model::CompositionDescription;

/// Lifecycle state of a render job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    /// No submission yet, or the job was reset.
    NotStarted,

    /// Submit request in flight, no acknowledgment yet.
    Submitting,

    /// Acknowledged by the service; percent is `0.0..=100.0`.
    InProgress { percent: f64 },

    /// Terminal: the service produced an output artifact.
    Completed { output_url: String },

    /// Terminal: the submission or the job failed.
    Failed { reason: String },
}

impl JobState {
    /// Whether no further updates can apply to this job.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed { .. } | JobState::Failed { .. })
    }

    /// Short label for logging and display.
    pub fn label(&self) -> &'static str {
        match self {
            JobState::NotStarted => "not_started",
            JobState::Submitting => "submitting",
            JobState::InProgress { .. } => "in_progress",
            JobState::Completed { .. } => "completed",
            JobState::Failed { .. } => "failed",
        }
    }
}

/// The payload that produced a job, retained for resubmission.
///
/// The composition is a snapshot taken at submit time; later overlay
/// edits never affect an in-flight job.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Local path to the source video.
    pub video_path: PathBuf,

    /// Serialized composition captured at submit time.
    pub composition: CompositionDescription,
}

/// Status-stream events applied to a job.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// The service accepted the submission and assigned an id.
    Acknowledged { job_id: String },

    /// Progress report, percent `0.0..=100.0`.
    Progress { percent: f64 },

    /// The job finished; the output artifact is at `output_url`.
    Completed { output_url: String },

    /// The submission or the job failed.
    Failed { reason: String },
}

/// A render job tracked by the session.
#[derive(Debug, Clone)]
pub struct RenderJob {
    state: JobState,
    job_id: Option<String>,
    request: Option<SubmitRequest>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for RenderJob {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderJob {
    /// A fresh job that has never been submitted.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            state: JobState::NotStarted,
            job_id: None,
            request: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Service-assigned identifier, absent before acknowledgment.
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    /// The request that produced this job, kept for resubmission.
    pub fn request(&self) -> Option<&SubmitRequest> {
        self.request.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Begin a new submission, replacing any previous terminal job.
    ///
    /// Refused while a job is already in flight; one job per session at
    /// a time.
    pub fn begin_submit(&mut self, request: SubmitRequest) -> OvercutResult<()> {
        if matches!(self.state, JobState::Submitting | JobState::InProgress { .. }) {
            return Err(OvercutError::precondition(
                "a render job is already in flight",
            ));
        }
        self.job_id = None;
        self.request = Some(request);
        self.created_at = Utc::now();
        self.set_state(JobState::Submitting);
        Ok(())
    }

    /// Record the service's acknowledgment. Valid only while
    /// `Submitting`; anything else is a stale event and is dropped.
    pub fn acknowledge(&mut self, job_id: impl Into<String>) {
        let job_id = job_id.into();
        if self.state != JobState::Submitting {
            tracing::warn!(
                job_id = %job_id,
                state = self.state.label(),
                "Dropping acknowledgment outside Submitting"
            );
            return;
        }
        self.job_id = Some(job_id);
        self.set_state(JobState::InProgress { percent: 0.0 });
    }

    /// Apply a progress report. Regressions are a protocol violation:
    /// logged and dropped so displayed progress never moves backward.
    pub fn update_progress(&mut self, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        match self.state {
            JobState::InProgress { percent: current } => {
                if percent < current {
                    tracing::warn!(
                        current,
                        received = percent,
                        job_id = self.job_id.as_deref().unwrap_or(""),
                        "Dropping regressive progress update"
                    );
                    return;
                }
                self.set_state(JobState::InProgress { percent });
            }
            _ => {
                tracing::warn!(
                    state = self.state.label(),
                    "Dropping progress update outside InProgress"
                );
            }
        }
    }

    /// Mark the job completed with its output artifact.
    pub fn complete(&mut self, output_url: impl Into<String>) {
        if !matches!(self.state, JobState::InProgress { .. }) {
            tracing::warn!(
                state = self.state.label(),
                "Dropping completion outside InProgress"
            );
            return;
        }
        self.set_state(JobState::Completed {
            output_url: output_url.into(),
        });
    }

    /// Mark the job failed. Valid from `Submitting` (transport or
    /// decode failure at submit) and `InProgress` (reported by the
    /// service or reconnect exhaustion).
    pub fn fail(&mut self, reason: impl Into<String>) {
        if !matches!(self.state, JobState::Submitting | JobState::InProgress { .. }) {
            tracing::warn!(
                state = self.state.label(),
                "Dropping failure outside an active job"
            );
            return;
        }
        self.set_state(JobState::Failed {
            reason: reason.into(),
        });
    }

    /// Reset to `NotStarted`, clearing the job id. The last request is
    /// retained for resubmission.
    pub fn reset(&mut self) {
        self.job_id = None;
        self.set_state(JobState::NotStarted);
    }

    /// Apply one status-stream event.
    pub fn apply(&mut self, event: JobEvent) {
        match event {
            JobEvent::Acknowledged { job_id } => self.acknowledge(job_id),
            JobEvent::Progress { percent } => self.update_progress(percent),
            JobEvent::Completed { output_url } => self.complete(output_url),
            JobEvent::Failed { reason } => self.fail(reason),
        }
    }

    fn set_state(&mut self, state: JobState) {
        tracing::debug!(
            from = self.state.label(),
            to = state.label(),
            "Render job transition"
        );
        self.state = state;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmitRequest {
        SubmitRequest {
            video_path: PathBuf::from("/tmp/video.mp4"),
            composition: CompositionDescription {
                version: 1,
                duration: Some(10.0),
                overlays: vec![],
            },
        }
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut job = RenderJob::new();
        assert_eq!(*job.state(), JobState::NotStarted);

        job.begin_submit(request()).unwrap();
        assert_eq!(*job.state(), JobState::Submitting);
        assert_eq!(job.job_id(), None);

        job.acknowledge("j1");
        assert_eq!(*job.state(), JobState::InProgress { percent: 0.0 });
        assert_eq!(job.job_id(), Some("j1"));

        job.update_progress(40.0);
        job.complete("http://render/result/j1");
        assert_eq!(
            *job.state(),
            JobState::Completed {
                output_url: "http://render/result/j1".to_string()
            }
        );
        assert!(job.state().is_terminal());
    }

    #[test]
    fn test_regressive_progress_is_dropped() {
        let mut job = RenderJob::new();
        job.begin_submit(request()).unwrap();
        job.acknowledge("j1");

        job.update_progress(10.0);
        job.update_progress(5.0);
        assert_eq!(*job.state(), JobState::InProgress { percent: 10.0 });

        job.update_progress(100.0);
        job.complete("http://render/result/j1");
        assert!(job.state().is_terminal());
    }

    #[test]
    fn test_submit_while_in_flight_is_precondition_error() {
        let mut job = RenderJob::new();
        job.begin_submit(request()).unwrap();
        assert!(job.begin_submit(request()).is_err());

        job.acknowledge("j1");
        assert!(job.begin_submit(request()).is_err());
        assert_eq!(*job.state(), JobState::InProgress { percent: 0.0 });
    }

    #[test]
    fn test_terminal_states_reject_updates() {
        let mut job = RenderJob::new();
        job.begin_submit(request()).unwrap();
        job.acknowledge("j1");
        job.complete("out");

        job.update_progress(50.0);
        job.fail("late failure");
        job.acknowledge("j2");
        assert_eq!(
            *job.state(),
            JobState::Completed {
                output_url: "out".to_string()
            }
        );
        assert_eq!(job.job_id(), Some("j1"));
    }

    #[test]
    fn test_completed_cannot_reenter_in_progress() {
        let mut job = RenderJob::new();
        job.begin_submit(request()).unwrap();
        job.acknowledge("j1");
        job.complete("out");
        job.apply(JobEvent::Progress { percent: 10.0 });
        assert!(job.state().is_terminal());
    }

    #[test]
    fn test_submit_failure_path() {
        let mut job = RenderJob::new();
        job.begin_submit(request()).unwrap();
        job.fail("connection refused");
        assert_eq!(
            *job.state(),
            JobState::Failed {
                reason: "connection refused".to_string()
            }
        );

        // A fresh submit replaces the failed job entirely.
        job.begin_submit(request()).unwrap();
        assert_eq!(*job.state(), JobState::Submitting);
        assert_eq!(job.job_id(), None);
    }

    #[test]
    fn test_reset_keeps_request_for_resubmission() {
        let mut job = RenderJob::new();
        job.begin_submit(request()).unwrap();
        job.fail("timeout");
        job.reset();
        assert_eq!(*job.state(), JobState::NotStarted);
        assert_eq!(job.job_id(), None);
        assert!(job.request().is_some());
    }

    #[test]
    fn test_progress_is_clamped_to_percent_range() {
        let mut job = RenderJob::new();
        job.begin_submit(request()).unwrap();
        job.acknowledge("j1");
        job.update_progress(250.0);
        assert_eq!(*job.state(), JobState::InProgress { percent: 100.0 });
    }
}
