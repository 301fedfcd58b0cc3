//! Metric recording helpers for the delivery path

use metrics::{counter, gauge};

/// Record one successfully delivered line for the given sink kind
pub fn record_line_sent(sink: &'static str) {
    counter!("loggen_lines_sent_total", "sink" => sink).increment(1);
}

/// Record one failed send for the given sink kind
pub fn record_send_failure(sink: &'static str) {
    counter!("loggen_send_failures_total", "sink" => sink).increment(1);
}

/// Record the current delivery queue depth
pub fn record_queue_depth(depth: usize) {
    gauge!("loggen_delivery_queue_depth").set(depth as f64);
}
