//! # Observability
//!
//! Prometheus metrics export and delivery metric recording.
//!
//! Tracing initialization lives at the CLI edge; this crate only owns the
//! metrics side so library crates never install a global subscriber.

mod metrics;

pub use crate::metrics::{record_line_sent, record_queue_depth, record_send_failure};

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize the Prometheus metrics endpoint
///
/// Listens on `0.0.0.0:<port>`; call at most once per process.
pub fn init_metrics_only(port: u16) -> Result<()> {
    let builder = PrometheusBuilder::new();
    builder
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
