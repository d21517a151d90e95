//! The editing session controller.
//!
//! Owns the overlay store, the loaded video, and the render job. All
//! mutation goes through `&mut self`; the background tracking task for
//! an in-flight job never touches session state directly, it only sends
//! `JobEvent`s over a channel that the owner drains with
//! [`SessionController::pump_job_events`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use overcut_common::config::AppConfig;
use overcut_common::error::{OvercutError, OvercutResult};
use overcut_overlay_model::{
    timeline, CompositionDescription, Overlay, OverlayDefaults, OverlayId, OverlayStore,
    StoreError,
};
use overcut_render_client::{JobEvent, RenderClient, RenderJob, SubmitRequest};
use tokio::sync::mpsc;

use crate::video::{PickerOutcome, VideoSource};

/// One editing session: a source video, its overlays, and at most one
/// render job.
#[derive(Debug)]
pub struct SessionController {
    store: OverlayStore,
    video: Option<VideoSource>,
    job: RenderJob,
    client: RenderClient,
    playback_position: f64,

    /// Event channel for the current submission; replaced wholesale on
    /// each submit so a stale tracker can never feed the new job.
    job_events: Option<mpsc::UnboundedReceiver<JobEvent>>,
    monitor_stop: Option<Arc<AtomicBool>>,
}

impl SessionController {
    /// Build a session from configuration.
    pub fn new(config: &AppConfig) -> OvercutResult<Self> {
        let client = RenderClient::new(config.render_service.clone())?;
        let defaults = OverlayDefaults {
            text_payload: config.editor.default_text.clone(),
            window_secs: config.editor.default_window_secs,
            ..OverlayDefaults::default()
        };
        Ok(Self {
            store: OverlayStore::with_defaults(defaults),
            video: None,
            job: RenderJob::new(),
            client,
            playback_position: 0.0,
            job_events: None,
            monitor_stop: None,
        })
    }

    pub fn store(&self) -> &OverlayStore {
        &self.store
    }

    pub fn job(&self) -> &RenderJob {
        &self.job
    }

    pub fn video(&self) -> Option<&VideoSource> {
        self.video.as_ref()
    }

    pub fn playback_position(&self) -> f64 {
        self.playback_position
    }

    /// Handle the outcome of the video picker. Returns whether a video
    /// was loaded; cancellation leaves the session untouched.
    pub fn on_video_picked(&mut self, outcome: PickerOutcome) -> bool {
        match outcome {
            PickerOutcome::Cancelled => {
                tracing::debug!("Video picker cancelled");
                false
            }
            PickerOutcome::Picked(handle) => {
                tracing::info!(uri = %handle.uri.display(), "Video loaded");
                self.video = Some(VideoSource::new(handle));
                self.playback_position = 0.0;
                true
            }
        }
    }

    /// Record the video duration once playback metadata arrives.
    pub fn on_duration_loaded(&mut self, duration_secs: f64) {
        if let Some(video) = &mut self.video {
            video.duration_secs = Some(duration_secs);
        }
        self.store.set_video_duration(duration_secs);
    }

    /// Advance the playback position and return the overlays visible at
    /// it, in paint order.
    pub fn on_position_update(&mut self, position_secs: f64) -> Vec<&Overlay> {
        self.playback_position = position_secs;
        timeline::visible_at(&self.store, position_secs)
    }

    /// Add a text overlay with defaults; it becomes the selection.
    pub fn add_text_overlay(&mut self) -> OverlayId {
        self.store.add_text()
    }

    /// Handle the outcome of the image picker. Cancellation adds
    /// nothing.
    pub fn add_image_overlay(&mut self, outcome: PickerOutcome) -> Option<OverlayId> {
        match outcome {
            PickerOutcome::Cancelled => {
                tracing::debug!("Image picker cancelled");
                None
            }
            PickerOutcome::Picked(handle) => {
                Some(self.store.add_image(handle.uri.to_string_lossy()))
            }
        }
    }

    pub fn select_overlay(&mut self, id: Option<OverlayId>) -> OvercutResult<()> {
        self.store.select(id).map_err(store_error)
    }

    pub fn set_overlay_text(&mut self, id: OverlayId, text: &str) -> OvercutResult<()> {
        self.store.set_text(id, text).map_err(store_error)
    }

    pub fn update_overlay_timing(
        &mut self,
        id: OverlayId,
        visible_from: f64,
        visible_until: f64,
    ) -> OvercutResult<()> {
        self.store
            .update_timing(id, visible_from, visible_until)
            .map_err(store_error)
    }

    pub fn remove_overlay(&mut self, id: OverlayId) -> OvercutResult<()> {
        self.store.remove(id).map_err(store_error)?;
        Ok(())
    }

    /// Submit the current video and composition for rendering.
    ///
    /// Fails without touching the job when no video is loaded or a job
    /// is already in flight. On success the job is `Submitting` and a
    /// background task carries the upload and status tracking; its
    /// events surface through [`Self::pump_job_events`].
    pub fn submit_render(&mut self) -> OvercutResult<()> {
        let video = self
            .video
            .as_ref()
            .ok_or_else(|| OvercutError::precondition("no video loaded"))?;

        let request = SubmitRequest {
            video_path: video.handle.uri.clone(),
            // Snapshot taken here; later edits cannot affect this job.
            composition: CompositionDescription::from_store(&self.store),
        };
        self.job.begin_submit(request.clone())?;

        self.cancel_tracking();
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        self.job_events = Some(rx);
        self.monitor_stop = Some(stop.clone());

        let client = self.client.clone();
        tokio::spawn(async move {
            match client.submit(&request.video_path, &request.composition).await {
                Ok(job_id) => {
                    if tx
                        .send(JobEvent::Acknowledged {
                            job_id: job_id.clone(),
                        })
                        .is_err()
                    {
                        return;
                    }
                    let _ = client.track(&job_id, stop, &tx).await;
                }
                Err(e) => {
                    let _ = tx.send(JobEvent::Failed {
                        reason: e.to_string(),
                    });
                }
            }
        });

        Ok(())
    }

    /// Drain pending job events into the job state machine. Call from
    /// the owning loop; returns how many events were applied.
    pub fn pump_job_events(&mut self) -> usize {
        let Some(events) = &mut self.job_events else {
            return 0;
        };
        let mut applied = 0;
        while let Ok(event) = events.try_recv() {
            self.job.apply(event);
            applied += 1;
        }
        if self.job.state().is_terminal() {
            self.job_events = None;
            self.monitor_stop = None;
        }
        applied
    }

    /// Stop tracking the current job without touching the server-side
    /// job.
    pub fn cancel_tracking(&mut self) {
        if let Some(stop) = self.monitor_stop.take() {
            stop.store(true, Ordering::SeqCst);
        }
        self.job_events = None;
    }

    /// Clear a terminal job back to `NotStarted`.
    pub fn reset_job(&mut self) {
        self.cancel_tracking();
        self.job.reset();
    }
}

fn store_error(e: StoreError) -> OvercutError {
    OvercutError::session(e.to_string())
}
