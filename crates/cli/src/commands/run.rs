//! `run` command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::oneshot;
use tracing::{info, warn};

use contracts::{GeneratorConfig, LineSpec};
use scheduler::{DeliveryPool, Dispatcher, ScheduleTable};
use sinks::SinkSet;

use crate::cli::RunArgs;

/// Seconds between startup and the first schedulable tick, giving every
/// line a full epoch to land in a future bucket
const STARTUP_GRACE_SECS: i64 = 5;

/// Execute the `run` command
pub async fn run_generator(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let specs = config_loader::load_lines(&config).context("Failed to load line definitions")?;
    if specs.is_empty() {
        anyhow::bail!("No usable line definitions after loading the configured files");
    }

    info!(
        lines = specs.len(),
        output = %config.output,
        workers = args.workers,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config, &specs);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let sinks = Arc::new(
        SinkSet::from_config(&config)
            .await
            .context("Failed to build sinks")?,
    );
    let pool = DeliveryPool::spawn(sinks, args.workers, args.queue_capacity);

    let ticker_epoch = Utc::now().timestamp() + STARTUP_GRACE_SECS;
    let table = ScheduleTable::initialize(specs, ticker_epoch)
        .context("Failed to build the schedule table")?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let dispatcher = Dispatcher::new(table, pool.queue());
    let dispatcher_handle = tokio::spawn(dispatcher.run(shutdown_rx));

    info!("Generator started");

    tokio::select! {
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping generator...");
        }
        _ = run_deadline(args.duration) => {
            info!(duration_secs = args.duration, "Run duration elapsed");
        }
    }

    // Stop the ticker first, then let the workers drain the queue
    let _ = shutdown_tx.send(());
    let table = dispatcher_handle
        .await
        .context("Dispatcher task failed")?;

    let metrics = Arc::clone(pool.metrics());
    pool.shutdown().await;

    let snapshot = metrics.snapshot();
    info!(
        lines_sent = snapshot.sent_count,
        send_failures = snapshot.failure_count,
        lines_dropped = snapshot.dropped_count,
        still_scheduled = table.len(),
        "loggen finished"
    );
    Ok(())
}

/// Resolves after `duration` seconds, or never when it is zero
async fn run_deadline(duration: u64) {
    if duration == 0 {
        std::future::pending::<()>().await;
    } else {
        tokio::time::sleep(Duration::from_secs(duration)).await;
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &GeneratorConfig, specs: &[LineSpec]) {
    println!("\n=== Configuration Summary ===\n");
    println!("Default output: {}", config.output);
    if let Some(ref loc) = config.http_loc {
        println!("HTTP endpoint: {}", loc);
    }
    if let Some(ref addr) = config.syslog_addr {
        println!("Syslog address: {}", addr);
    }
    if let Some(ref path) = config.file_output_path {
        println!("Output file: {}", path.display());
    }

    println!(
        "\nLines ({}) from {} data file(s), {} replay file(s):",
        specs.len(),
        config.data_files.len(),
        config.replay_files.len()
    );
    for spec in specs {
        println!(
            "  - [{}] every {}s (±{}s): {}",
            spec.route.kind(),
            spec.interval_secs,
            spec.interval_std_dev,
            spec.text
        );
    }

    println!();
}
