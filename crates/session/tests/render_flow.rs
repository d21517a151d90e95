//! Full session flow against a local render-service stub: pick a
//! video, edit overlays, submit, and pump job events to completion.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use overcut_common::config::AppConfig;
use overcut_render_client::JobState;
use overcut_session::{MediaHandle, PickerOutcome, SessionController};

fn start_stub(statuses: Vec<serde_json::Value>) -> (String, std::sync::mpsc::Sender<()>) {
    let queue = Arc::new(Mutex::new(VecDeque::from(statuses)));

    let server = rouille::Server::new("127.0.0.1:0", move |request| {
        if request.method() == "POST" && request.url() == "/upload" {
            return rouille::Response::json(&serde_json::json!({"job_id": "job-9"}));
        }
        if request.method() == "GET" && request.url().starts_with("/status/") {
            let mut queue = queue.lock().unwrap();
            let payload = if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue
                    .front()
                    .cloned()
                    .unwrap_or_else(|| serde_json::json!({"status": "failed"}))
            };
            return rouille::Response::json(&payload);
        }
        rouille::Response::empty_404()
    })
    .expect("failed to start stub server");

    let base_url = format!("http://{}", server.server_addr());
    let (_handle, stop) = server.stoppable();
    (base_url, stop)
}

#[tokio::test]
async fn session_submits_and_reaches_completion() {
    let (base_url, _stop) = start_stub(vec![
        serde_json::json!({"status": "queued", "progress": 0.0}),
        serde_json::json!({"status": "processing", "progress": 60.0}),
        serde_json::json!({"status": "done", "progress": 100.0}),
    ]);

    let video_path = std::env::temp_dir().join(format!("overcut-flow-{}.mp4", std::process::id()));
    std::fs::write(&video_path, b"fake mp4 bytes").unwrap();

    let mut config = AppConfig::default();
    config.render_service.base_url = base_url.clone();
    config.render_service.poll_interval_ms = 10;

    let mut session = SessionController::new(&config).unwrap();
    assert!(session.on_video_picked(PickerOutcome::Picked(MediaHandle::new(&video_path))));
    session.on_duration_loaded(10.0);

    let id = session.add_text_overlay();
    session.set_overlay_text(id, "hello").unwrap();
    session.update_overlay_timing(id, 1.0, 4.0).unwrap();

    session.submit_render().unwrap();
    assert_eq!(*session.job().state(), JobState::Submitting);

    for _ in 0..500 {
        session.pump_job_events();
        if session.job().state().is_terminal() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    match session.job().state() {
        JobState::Completed { output_url } => {
            assert_eq!(output_url, &format!("{base_url}/result/job-9"));
        }
        other => panic!("expected completed job, got {other:?}"),
    }
    assert_eq!(session.job().job_id(), Some("job-9"));

    // Editing continues normally after completion, and a new submission
    // replaces the finished job.
    session.update_overlay_timing(id, 2.0, 6.0).unwrap();
    session.submit_render().unwrap();
    assert_eq!(*session.job().state(), JobState::Submitting);

    std::fs::remove_file(video_path).ok();
}

#[tokio::test]
async fn session_surfaces_service_reported_failure() {
    let (base_url, _stop) = start_stub(vec![
        serde_json::json!({"status": "processing", "progress": 30.0}),
        serde_json::json!({"status": "failed", "message": "ffmpeg exited 1"}),
    ]);

    let video_path =
        std::env::temp_dir().join(format!("overcut-flow-fail-{}.mp4", std::process::id()));
    std::fs::write(&video_path, b"fake mp4 bytes").unwrap();

    let mut config = AppConfig::default();
    config.render_service.base_url = base_url;
    config.render_service.poll_interval_ms = 10;

    let mut session = SessionController::new(&config).unwrap();
    session.on_video_picked(PickerOutcome::Picked(MediaHandle::new(&video_path)));
    session.on_duration_loaded(8.0);
    session.add_text_overlay();

    session.submit_render().unwrap();
    for _ in 0..500 {
        session.pump_job_events();
        if session.job().state().is_terminal() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    match session.job().state() {
        JobState::Failed { reason } => assert_eq!(reason, "ffmpeg exited 1"),
        other => panic!("expected failed job, got {other:?}"),
    }

    // The failed job resets for a clean retry.
    session.reset_job();
    assert_eq!(*session.job().state(), JobState::NotStarted);

    std::fs::remove_file(video_path).ok();
}
