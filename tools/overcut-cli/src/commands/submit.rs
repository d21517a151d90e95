//! Submit a render job and follow it to a terminal state.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use overcut_common::config::AppConfig;
use overcut_overlay_model::CompositionDescription;
use overcut_render_client::{JobEvent, RenderClient};
use tokio::sync::mpsc;

pub async fn run(
    config: &AppConfig,
    video: PathBuf,
    composition_path: PathBuf,
    follow: bool,
) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&composition_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", composition_path.display()))?;
    let composition = CompositionDescription::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Failed to parse composition: {e}"))?;

    println!("Submitting render job");
    println!("  Video: {}", video.display());
    println!("  Overlays: {}", composition.overlays.len());
    println!("  Server: {}", config.render_service.endpoint_base());

    let client = RenderClient::new(config.render_service.clone())?;
    let job_id = client.submit(&video, &composition).await?;
    println!("  Job id: {job_id}");

    if !follow {
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));
    let tracker = {
        let client = client.clone();
        let job_id = job_id.clone();
        tokio::spawn(async move { client.track(&job_id, stop, &tx).await })
    };

    while let Some(event) = rx.recv().await {
        match event {
            JobEvent::Acknowledged { job_id } => println!("  Acknowledged: {job_id}"),
            JobEvent::Progress { percent } => {
                print!("\r  Progress: {percent:.1}%  ");
            }
            JobEvent::Completed { output_url } => {
                println!("\nRender complete: {output_url}");
            }
            JobEvent::Failed { reason } => {
                println!("\nRender failed: {reason}");
            }
        }
    }

    tracker.await??;
    Ok(())
}
