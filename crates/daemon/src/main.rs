//! terminal-sync daemon entry point.
//!
//! Loads configuration, binds a terminal to its file endpoint, runs the tick
//! scheduler, and handles graceful shutdown.

mod scheduler;
mod signals;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use terminal_sync_core::config::AppConfig;
use terminal_sync_core::endpoint::FileEndpoint;
use terminal_sync_core::packet::Packet;
use terminal_sync_core::sync::Terminal;

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// terminal-sync daemon.
#[derive(Parser, Debug)]
#[command(
    name = "terminal-sync-daemon",
    version,
    about = "Keep a terminal packet in sync with an editable text file"
)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Override the log level from the config file (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config =
        AppConfig::load_from_file(&args.config).context("failed to load configuration file")?;
    config
        .validate()
        .context("configuration validation failed")?;

    // Initialize tracing
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.daemon.log_level);

    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    info!("========================================");
    info!("  terminal-sync daemon v{}", env!("CARGO_PKG_VERSION"));
    info!("========================================");
    info!("Config file   : {}", args.config.display());
    info!("Endpoint      : {}", config.endpoint.path.display());
    info!("Tick interval : {}ms", config.daemon.tick_interval_ms);
    info!("Log level     : {}", log_level);
    info!("========================================");

    let endpoint = FileEndpoint::new(&config.endpoint.path)
        .with_create_if_missing(config.endpoint.create_if_missing);

    let mut packet = Packet::new();
    config.session.apply(&mut packet);
    let mut terminal = Terminal::with_packet(endpoint, packet);

    if config.daemon.push_on_start {
        terminal
            .push()
            .context("failed to write initial state to endpoint")?;
    }

    let shutdown = Arc::new(tokio::sync::Notify::new());
    let scheduler_shutdown = shutdown.clone();

    let interval = Duration::from_millis(config.daemon.tick_interval_ms);
    let mut sched = scheduler::Scheduler::new(terminal, interval);

    let scheduler_handle = tokio::spawn(async move {
        sched.run(scheduler_shutdown).await;
        sched
    });

    if let Err(e) = signals::wait_for_shutdown().await {
        warn!(error = %e, "signal handler failed, shutting down");
    }
    info!("Shutdown signal received, stopping...");

    // notify_one keeps a permit if the scheduler is mid-tick.
    shutdown.notify_one();

    match tokio::time::timeout(Duration::from_secs(5), scheduler_handle).await {
        Ok(Ok(sched)) => {
            let stats = sched.stats();
            info!(
                ticks = stats.total_ticks,
                accepted = stats.accepted,
                synchronized = stats.synchronized,
                rejected = stats.rejected,
                endpoint_errors = stats.endpoint_errors,
                error_count = sched.terminal().packet().error_count(),
                "scheduler stopped gracefully"
            );
        }
        Ok(Err(e)) => warn!("scheduler task error: {}", e),
        Err(_) => warn!("scheduler did not stop within 5s, forcing shutdown"),
    }

    info!("terminal-sync daemon stopped.");
    Ok(())
}
