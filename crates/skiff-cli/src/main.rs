mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "skiff", about = "Build, push, and deploy Rust services to Cloud Run")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add skiff to an existing Rust project
    Init,
    /// Build the image, push it, and deploy to Cloud Run
    Deploy {
        /// Allow deploying with uncommitted changes
        #[arg(long)]
        allow_dirty: bool,
        /// Builder toolchain profile: pinned or floating
        #[arg(long)]
        profile: Option<String>,
        /// Commit id to tag the image with (default: git rev-parse HEAD)
        #[arg(long)]
        commit: Option<String>,
    },
    /// Eject the generated Dockerfile for manual customization
    Eject,
    /// Check gcloud/docker setup and GCP project readiness
    Doctor,
    /// Show Cloud Run service status
    Status,
    /// Read recent Cloud Run logs
    Logs {
        /// Number of log entries to show (default: 100)
        #[arg(long, short = 'n')]
        tail: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init_project().await?,
        Commands::Deploy {
            allow_dirty,
            profile,
            commit,
        } => commands::deploy(allow_dirty, profile.as_deref(), commit.as_deref()).await?,
        Commands::Eject => commands::eject().await?,
        Commands::Doctor => commands::doctor().await?,
        Commands::Status => commands::status().await?,
        Commands::Logs { tail } => commands::logs(tail).await?,
    }

    Ok(())
}
