// Rover relay - bridges an external controller to attached robots

use clap::Parser;
use rover_core::config::load_config;
use rover_relay::{RelayConfig, RelayServer};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rover-relay")]
#[command(about = "Relay robot telemetry over HTTP and commands over WebSocket", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (JSON or TOML)
    #[arg(long, short)]
    config: Option<String>,

    /// HTTP listen address
    #[arg(long)]
    http_addr: Option<String>,

    /// WebSocket listen address
    #[arg(long)]
    ws_addr: Option<String>,

    /// Outbound queue depth per robot channel
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Forward captured frames through the HTTP /frame endpoint
    #[arg(long)]
    forward_frames_over_http: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let mut config: RelayConfig = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(addr) = cli.http_addr {
        config.http_addr = addr;
    }
    if let Some(addr) = cli.ws_addr {
        config.ws_addr = addr;
    }
    if let Some(capacity) = cli.queue_capacity {
        config.channel_queue_capacity = capacity;
    }
    if cli.forward_frames_over_http {
        config.forward_frames_over_http = true;
    }

    info!("Starting rover relay");
    let mut handle = RelayServer::new(config)?.start().await?;

    tokio::select! {
        _ = signal::ctrl_c() => info!("Shutdown signal received"),
        _ = handle.wait() => {}
    }

    handle.shutdown();
    Ok(())
}
