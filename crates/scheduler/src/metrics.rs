//! Delivery metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters shared by the delivery workers
#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Total successful sends
    sent_count: AtomicU64,
    /// Total failed sends
    failure_count: AtomicU64,
    /// Total lines dropped before reaching a sink
    dropped_count: AtomicU64,
}

impl DeliveryMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current queue length
    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    /// Set current queue length
    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    /// Get total sent count
    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::Relaxed)
    }

    /// Increment sent count
    pub fn inc_sent_count(&self) {
        self.sent_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get dropped count
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Increment dropped count
    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            sent_count: self.sent_count(),
            failure_count: self.failure_count(),
            dropped_count: self.dropped_count(),
        }
    }
}

/// Snapshot of delivery metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub sent_count: u64,
    pub failure_count: u64,
    pub dropped_count: u64,
}
