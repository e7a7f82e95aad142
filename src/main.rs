use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use futures::future::join_all;
use tracing::{info, Level};
use tracing_subscriber;

use rategate::config::GateConfig;
use rategate::gate::{PacingPolicy, RateGate};

/// Drive a shared pacing gate with a pool of concurrent workers.
#[derive(Debug, Parser)]
#[command(name = "rategate", version, about)]
struct Args {
    /// Path to a YAML gate configuration file (overrides the flags below)
    #[arg(long)]
    config: Option<String>,

    /// Calls allowed per window
    #[arg(long, default_value_t = 10)]
    max_count: u32,

    /// Window length in seconds
    #[arg(long, default_value_t = 1.0)]
    per_seconds: f64,

    /// Let calls burst through a whole window, then pause
    #[arg(long)]
    greedy: bool,

    /// Number of concurrent workers sharing the gate
    #[arg(long, default_value_t = 20)]
    workers: usize,

    /// Calls each worker performs
    #[arg(long, default_value_t = 1)]
    calls: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .init();

    info!("Starting rategate driver");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => GateConfig::from_file(path)?,
        None => GateConfig {
            max_count: args.max_count,
            per_seconds: args.per_seconds,
            policy: if args.greedy {
                PacingPolicy::Greedy
            } else {
                PacingPolicy::Steady
            },
        },
    };

    let gate = Arc::new(RateGate::from_config(&config)?);
    info!(
        max_count = gate.max_count(),
        per_seconds = gate.per().as_secs_f64(),
        policy = %gate.policy(),
        rate = gate.rate(),
        "Gate initialized"
    );

    let started = std::time::Instant::now();

    // Fan the workers out; each shares the one gate and reports how long it
    // was paused per call.
    let workers = (0..args.workers).map(|worker| {
        let gate = Arc::clone(&gate);
        let calls = args.calls;
        tokio::spawn(async move {
            let mut paused_total = Duration::ZERO;
            for _ in 0..calls {
                let paused = gate.wait().await;
                info!(worker, paused_secs = paused.as_secs_f64(), "Cleared the gate");
                paused_total += paused;
            }
            paused_total
        })
    });

    let mut paused_total = Duration::ZERO;
    for total in join_all(workers).await {
        paused_total += total?;
    }

    info!(
        calls = gate.count(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        paused_secs = paused_total.as_secs_f64(),
        "All workers finished"
    );

    Ok(())
}
