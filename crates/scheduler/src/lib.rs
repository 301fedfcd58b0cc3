//! # Scheduler
//!
//! Scheduling and dispatch module.
//!
//! Responsibilities:
//! - Time-bucket pending lines in the [`ScheduleTable`]
//! - Fire due lines once per second from the [`Dispatcher`]
//! - Hand resolved payloads to the bounded [`DeliveryPool`]
//!
//! Tick dispatch is serialized: one task owns all table mutation, so a
//! tick can never interleave inserts with the next one. Delivery runs
//! concurrently on the worker pool and never touches the table.

pub mod dispatcher;
pub mod metrics;
pub mod pool;
pub mod table;

pub use dispatcher::{next_fire_time, Dispatcher};
pub use metrics::{DeliveryMetrics, MetricsSnapshot};
pub use pool::{Delivery, DeliveryPool, DeliveryQueue};
pub use table::ScheduleTable;
