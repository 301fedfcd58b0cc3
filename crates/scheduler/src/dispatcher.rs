//! Dispatcher - serialized tick loop firing due lines
//!
//! Driven by a 1-second timer. Each tick detaches the due bucket,
//! resolves every detached line, enqueues the payloads on the delivery
//! pool and reinserts the specs at their jittered next fire time. Ticks
//! never overlap: the dispatcher task is the single owner of the table.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use contracts::LineSpec;
use rand_distr::{Distribution, Normal};
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::pool::{Delivery, DeliveryQueue};
use crate::table::ScheduleTable;

/// Floor for the jittered interval; a large negative draw from the jitter
/// distribution must not re-fire a line immediately
const MIN_INTERVAL_MILLIS: i64 = 1000;

/// The dispatch engine: owns the schedule table, feeds the delivery pool
pub struct Dispatcher {
    table: ScheduleTable,
    queue: DeliveryQueue,
}

impl Dispatcher {
    /// Create a dispatcher over an initialized table
    pub fn new(table: ScheduleTable, queue: DeliveryQueue) -> Self {
        Self { table, queue }
    }

    /// Fire every line due at or before `now`.
    ///
    /// Resolution uses `now` as the timestamp context; the send itself is
    /// fire-and-forget from the tick's perspective, a failure never
    /// unschedules the line.
    pub async fn tick(&mut self, now: i64) {
        let due = self.table.detach_due(now);
        if due.is_empty() {
            return;
        }

        info!(time = now, count = due.len(), "dispatching due lines");
        let timestamp_context = DateTime::<Utc>::from_timestamp(now, 0).unwrap_or_else(Utc::now);

        for spec in due {
            let resolved =
                randomizer::resolve_at(&spec.text, &spec.timestamp_format, timestamp_context);
            self.queue
                .enqueue(Delivery {
                    payload: Bytes::from(resolved),
                    spec: spec.clone(),
                })
                .await;

            let next_time = next_fire_time(now, &spec);
            debug!(line = %spec.text, next_time, "scheduled next run");
            self.table.insert(next_time, spec);
        }
    }

    /// Run the tick loop until the shutdown signal fires.
    ///
    /// Returns the table so callers can report what was still scheduled.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> ScheduleTable {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(lines = self.table.len(), "dispatcher started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("dispatcher shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    let now = Utc::now().timestamp();
                    self.tick(now).await;
                }
            }
        }

        info!(lines = self.table.len(), "dispatcher stopped");
        self.table
    }
}

/// Next fire time for a spec fired at `now`: a normal draw around the mean
/// interval, floored at [`MIN_INTERVAL_MILLIS`], truncated to the second
pub fn next_fire_time(now: i64, spec: &LineSpec) -> i64 {
    let mean = spec.interval_millis() as f64;
    let jittered = match Normal::new(mean, spec.std_dev_millis()) {
        Ok(normal) => normal.sample(&mut rand::rng()).round() as i64,
        // Negative stddev cannot pass validation; fall back to the mean
        Err(_) => mean as i64,
    };

    let next_millis = jittered.max(MIN_INTERVAL_MILLIS);
    now + next_millis / 1000
}
