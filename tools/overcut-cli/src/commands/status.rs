//! Fetch a job's status, once or until it reaches a terminal state.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use overcut_common::config::AppConfig;
use overcut_render_client::{JobEvent, RenderClient};
use tokio::sync::mpsc;

pub async fn run(config: &AppConfig, job_id: String, watch: bool) -> anyhow::Result<()> {
    let client = RenderClient::new(config.render_service.clone())?;

    if !watch {
        let status = client.fetch_status(&job_id).await?;
        println!("Job: {}", status.job_id.as_deref().unwrap_or(&job_id));
        println!("  Status: {:?}", status.status);
        if let Some(progress) = status.progress {
            println!("  Progress: {progress:.1}%");
        }
        if let Some(message) = &status.message {
            println!("  Message: {message}");
        }
        if let Some(output_url) = &status.output_url {
            println!("  Output: {output_url}");
        }
        return Ok(());
    }

    println!("Watching job {job_id}");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));
    let tracker = {
        let client = client.clone();
        let job_id = job_id.clone();
        tokio::spawn(async move { client.track(&job_id, stop, &tx).await })
    };

    while let Some(event) = rx.recv().await {
        match event {
            JobEvent::Acknowledged { .. } => {}
            JobEvent::Progress { percent } => print!("\r  Progress: {percent:.1}%  "),
            JobEvent::Completed { output_url } => println!("\nRender complete: {output_url}"),
            JobEvent::Failed { reason } => println!("\nRender failed: {reason}"),
        }
    }

    tracker.await??;
    Ok(())
}
