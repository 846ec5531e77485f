// Rover navigator - drives a robot to a goal through the relay

use anyhow::Context;
use clap::Parser;
use rover_core::config::load_config;
use rover_core::goal::{corner_to_position, CORNER_MARGIN, FLOOR_HALF};
use rover_nav::{Controller, HttpRelayClient, NavigationConfig, RunOutcome, TokioTicker};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rover-nav")]
#[command(about = "Bug-2 navigation controller for a relayed robot", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the relay's HTTP surface
    #[arg(long, default_value = "http://localhost:5000")]
    relay_url: String,

    /// Goal x coordinate
    #[arg(long, allow_hyphen_values = true)]
    goal_x: Option<f64>,

    /// Goal z coordinate
    #[arg(long, allow_hyphen_values = true)]
    goal_z: Option<f64>,

    /// Named floor corner as goal (NE, SW, TL, ...); overrides coordinates
    #[arg(long)]
    corner: Option<String>,

    /// Step budget
    #[arg(long)]
    max_steps: Option<u32>,

    /// Configuration file (JSON or TOML)
    #[arg(long, short)]
    config: Option<String>,

    /// Skip the reset sent before the first step
    #[arg(long)]
    no_reset: bool,

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
        .init();

    let mut config: NavigationConfig = match &cli.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path))?,
        None => NavigationConfig::default(),
    };
    if let Some(x) = cli.goal_x {
        config.goal_x = x;
    }
    if let Some(z) = cli.goal_z {
        config.goal_z = z;
    }
    if let Some(corner) = &cli.corner {
        let goal = corner_to_position(corner, FLOOR_HALF, CORNER_MARGIN);
        config.goal_x = goal.x;
        config.goal_z = goal.z;
    }
    if let Some(steps) = cli.max_steps {
        config.max_steps = steps;
    }
    if cli.no_reset {
        config.reset_on_start = false;
    }

    let client = HttpRelayClient::from_config(&cli.relay_url, &config)?;
    let mut controller = Controller::new(config, client, TokioTicker)?;
    info!("Using relay at {}", cli.relay_url);

    tokio::select! {
        report = controller.run() => {
            match report.outcome {
                RunOutcome::GoalReached => info!(
                    "Goal reached after {} steps, {:.2} from goal",
                    report.steps, report.final_distance
                ),
                RunOutcome::StepBudgetExhausted => warn!(
                    "Gave up after {} steps, {:.2} from goal",
                    report.steps, report.final_distance
                ),
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ = signal::ctrl_c() => info!("Interrupted, stopping navigation"),
    }

    Ok(())
}
