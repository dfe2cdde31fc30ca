//! Engine counters

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics handle for recording counters/gauges
#[derive(Debug, Default)]
pub struct Metrics {
    workers_started: AtomicU64,
    workers_stopped: AtomicU64,
    workers_crashed: AtomicU64,
    fetch_succeeded: AtomicU64,
    fetch_failed: AtomicU64,
    stale_discarded: AtomicU64,
    active_workers: AtomicUsize,
    max_active_workers: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worker_started(&self) {
        self.workers_started.fetch_add(1, Ordering::SeqCst);
        let active = self.active_workers.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_workers.fetch_max(active, Ordering::SeqCst);
        tracing::debug!(counter = "workers_started", active, "Metric incremented");
    }

    pub fn worker_stopped(&self) {
        self.workers_stopped.fetch_add(1, Ordering::SeqCst);
        self.active_workers.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(counter = "workers_stopped", "Metric incremented");
    }

    pub fn worker_crashed(&self) {
        self.workers_crashed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "workers_crashed", "Metric incremented");
    }

    pub fn fetch_succeeded(&self) {
        self.fetch_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_failed(&self) {
        self.fetch_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stale_discarded(&self) {
        self.stale_discarded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "stale_discarded", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            workers_started: self.workers_started.load(Ordering::SeqCst),
            workers_stopped: self.workers_stopped.load(Ordering::SeqCst),
            workers_crashed: self.workers_crashed.load(Ordering::Relaxed),
            fetch_succeeded: self.fetch_succeeded.load(Ordering::Relaxed),
            fetch_failed: self.fetch_failed.load(Ordering::Relaxed),
            stale_discarded: self.stale_discarded.load(Ordering::Relaxed),
            active_workers: self.active_workers.load(Ordering::SeqCst),
            max_active_workers: self.max_active_workers.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub workers_started: u64,
    pub workers_stopped: u64,
    pub workers_crashed: u64,
    pub fetch_succeeded: u64,
    pub fetch_failed: u64,
    pub stale_discarded: u64,
    pub active_workers: usize,
    /// High-water mark of concurrently running workers
    pub max_active_workers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_worker_gauge() {
        let metrics = Metrics::new();
        metrics.worker_started();
        metrics.worker_stopped();
        metrics.worker_started();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.workers_started, 2);
        assert_eq!(snapshot.workers_stopped, 1);
        assert_eq!(snapshot.active_workers, 1);
        assert_eq!(snapshot.max_active_workers, 1);
    }
}
