//! Overcut CLI — Command-line interface for compositions and render jobs.
//!
//! Usage:
//!   overcut inspect <PATH>             Show a composition document
//!   overcut submit <VIDEO> <PATH>      Submit a render job and follow it
//!   overcut status <JOB_ID> [--watch]  Fetch or follow a job's status

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "overcut",
    about = "Overlay compositions and remote render jobs for mobile video edits",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Render service base URL (overrides configuration)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the contents of a composition document
    Inspect {
        /// Path to a composition JSON file
        path: PathBuf,
    },

    /// Submit a video plus composition for rendering and follow the job
    Submit {
        /// Path to the source video
        video: PathBuf,

        /// Path to a composition JSON file
        composition: PathBuf,

        /// Return after acknowledgment instead of following the job
        #[arg(long)]
        no_follow: bool,
    },

    /// Fetch a job's status
    Status {
        /// Service-assigned job id
        job_id: String,

        /// Keep polling until the job reaches a terminal state
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    overcut_common::logging::init_logging(&overcut_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    let mut config = overcut_common::config::AppConfig::load();
    if let Some(server) = cli.server {
        config.render_service.base_url = server;
    }

    match cli.command {
        Commands::Inspect { path } => commands::inspect::run(path),
        Commands::Submit {
            video,
            composition,
            no_follow,
        } => commands::submit::run(&config, video, composition, !no_follow).await,
        Commands::Status { job_id, watch } => commands::status::run(&config, job_id, watch).await,
    }
}
