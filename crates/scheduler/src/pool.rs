//! DeliveryPool - bounded worker pool consuming ready-to-send lines
//!
//! Decouples the 1-second scheduling cadence from sink I/O latency. The
//! queue is bounded and the dispatcher's enqueue blocks when it fills, so
//! a slow sink applies backpressure to the ticker instead of piling up
//! unbounded in-flight sends.

use std::sync::Arc;

use bytes::Bytes;
use contracts::LineSpec;
use observability::{record_line_sent, record_queue_depth, record_send_failure};
use sinks::SinkSet;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::metrics::DeliveryMetrics;

/// One resolved line ready for delivery
#[derive(Debug, Clone)]
pub struct Delivery {
    pub payload: Bytes,
    pub spec: LineSpec,
}

/// Producer side of the delivery queue, held by the dispatcher
#[derive(Clone)]
pub struct DeliveryQueue {
    tx: async_channel::Sender<Delivery>,
    metrics: Arc<DeliveryMetrics>,
}

impl DeliveryQueue {
    /// Enqueue one delivery, waiting for queue space if the workers are
    /// behind (block policy, preserves per-line send order)
    pub async fn enqueue(&self, delivery: Delivery) {
        self.metrics.set_queue_len(self.tx.len());
        if self.tx.send(delivery).await.is_err() {
            self.metrics.inc_dropped_count();
            error!("delivery workers stopped, line dropped");
        }
    }
}

/// Fixed-size set of delivery workers behind a bounded queue
pub struct DeliveryPool {
    tx: async_channel::Sender<Delivery>,
    workers: Vec<JoinHandle<()>>,
    metrics: Arc<DeliveryMetrics>,
}

impl DeliveryPool {
    /// Spawn `worker_count` workers consuming from a queue of
    /// `queue_capacity` entries
    pub fn spawn(sinks: Arc<SinkSet>, worker_count: usize, queue_capacity: usize) -> Self {
        let (tx, rx) = async_channel::bounded(queue_capacity);
        let metrics = Arc::new(DeliveryMetrics::new());

        let workers = (0..worker_count)
            .map(|worker_id| {
                let rx = rx.clone();
                let sinks = Arc::clone(&sinks);
                let metrics = Arc::clone(&metrics);
                tokio::spawn(async move {
                    delivery_worker(worker_id, rx, sinks, metrics).await;
                })
            })
            .collect();

        Self {
            tx,
            workers,
            metrics,
        }
    }

    /// Producer handle for the dispatcher
    pub fn queue(&self) -> DeliveryQueue {
        DeliveryQueue {
            tx: self.tx.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Shared delivery metrics
    pub fn metrics(&self) -> &Arc<DeliveryMetrics> {
        &self.metrics
    }

    /// Shutdown gracefully: close the queue, let workers drain it, join.
    ///
    /// Closing explicitly (rather than dropping the sender) ends the
    /// workers even while producer clones are still alive.
    pub async fn shutdown(self) {
        self.tx.close();
        for worker in self.workers {
            if let Err(e) = worker.await {
                error!(error = ?e, "delivery worker panicked");
            }
        }
        debug!("delivery pool shutdown complete");
    }
}

/// Worker task: pull deliveries and hand them to the matching sink
async fn delivery_worker(
    worker_id: usize,
    rx: async_channel::Receiver<Delivery>,
    sinks: Arc<SinkSet>,
    metrics: Arc<DeliveryMetrics>,
) {
    debug!(worker_id, "delivery worker started");

    while let Ok(delivery) = rx.recv().await {
        metrics.set_queue_len(rx.len());
        record_queue_depth(rx.len());

        let kind = delivery.spec.route.kind();
        match sinks.deliver(&delivery.payload, &delivery.spec).await {
            Ok(()) => {
                metrics.inc_sent_count();
                record_line_sent(kind.as_str());
            }
            Err(e) if e.is_fatal() => {
                // The file sink is load-bearing; a task panic would not
                // stop the process, so escalate explicitly.
                error!(worker_id, error = %e, "fatal sink error, aborting process");
                std::process::exit(1);
            }
            Err(e) => {
                metrics.inc_failure_count();
                record_send_failure(kind.as_str());
                warn!(
                    worker_id,
                    sink = %kind,
                    error = %e,
                    line = %delivery.spec.text,
                    "send failed, line stays scheduled"
                );
            }
        }
    }

    debug!(worker_id, "delivery worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{GeneratorConfig, SinkKind, SinkRoute};

    async fn file_sink_set(path: &std::path::Path) -> Arc<SinkSet> {
        let config = GeneratorConfig {
            output: SinkKind::File,
            http_loc: None,
            syslog_proto: None,
            syslog_addr: None,
            file_output_path: Some(path.to_path_buf()),
            data_files: vec![],
            replay_files: vec![],
        };
        Arc::new(SinkSet::from_config(&config).await.unwrap())
    }

    fn file_delivery(text: &str) -> Delivery {
        Delivery {
            payload: Bytes::from(text.to_string()),
            spec: LineSpec {
                text: text.into(),
                route: SinkRoute::File,
                interval_secs: 1,
                interval_std_dev: 0.0,
                timestamp_format: "epoch".into(),
                start_time: None,
            },
        }
    }

    #[tokio::test]
    async fn test_pool_drains_queue_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let sinks = file_sink_set(&path).await;

        let pool = DeliveryPool::spawn(sinks, 2, 8);
        let queue = pool.queue();
        for i in 0..5 {
            queue.enqueue(file_delivery(&format!("line-{i}"))).await;
        }
        drop(queue);
        pool.shutdown().await;

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 5);
    }

    #[tokio::test]
    async fn test_pool_counts_sends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let sinks = file_sink_set(&path).await;

        let pool = DeliveryPool::spawn(sinks, 1, 4);
        let metrics = Arc::clone(pool.metrics());
        let queue = pool.queue();
        for _ in 0..3 {
            queue.enqueue(file_delivery("x")).await;
        }
        drop(queue);
        pool.shutdown().await;

        assert_eq!(metrics.sent_count(), 3);
        assert_eq!(metrics.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_enqueue_after_shutdown_counts_drop() {
        let dir = tempfile::tempdir().unwrap();
        let sinks = file_sink_set(&dir.path().join("out.log")).await;

        let pool = DeliveryPool::spawn(sinks, 1, 4);
        let queue = pool.queue();
        let metrics = Arc::clone(pool.metrics());
        pool.shutdown().await;

        // Workers are gone; the line has nowhere to go
        queue.enqueue(file_delivery("orphan")).await;
        assert_eq!(metrics.dropped_count(), 1);
        assert_eq!(metrics.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_send_is_counted_not_fatal() {
        // Unreachable tcp endpoint: connection errors are non-fatal
        let config = GeneratorConfig {
            output: SinkKind::Syslog,
            http_loc: None,
            syslog_proto: None,
            syslog_addr: None,
            file_output_path: None,
            data_files: vec![],
            replay_files: vec![],
        };
        let sinks = Arc::new(SinkSet::from_config(&config).await.unwrap());

        let pool = DeliveryPool::spawn(sinks, 1, 4);
        let metrics = Arc::clone(pool.metrics());
        let queue = pool.queue();
        queue
            .enqueue(Delivery {
                payload: Bytes::from_static(b"x"),
                spec: LineSpec {
                    text: "x".into(),
                    route: SinkRoute::Syslog {
                        proto: contracts::SocketProto::Tcp,
                        addr: "127.0.0.1:1".into(),
                    },
                    interval_secs: 1,
                    interval_std_dev: 0.0,
                    timestamp_format: "epoch".into(),
                    start_time: None,
                },
            })
            .await;
        drop(queue);
        pool.shutdown().await;

        assert_eq!(metrics.failure_count(), 1);
        assert_eq!(metrics.sent_count(), 0);
    }
}
