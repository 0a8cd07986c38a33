//! Source metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by every task of a pool
#[derive(Debug, Default)]
pub struct SourceMetrics {
    /// Total readings handed to the sink
    readings_submitted: AtomicU64,

    /// Tasks that observed shutdown and returned
    tasks_stopped: AtomicU64,
}

impl SourceMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one submitted reading
    pub fn record_submitted(&self) {
        self.readings_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a task exit
    pub fn record_stopped(&self) {
        self.tasks_stopped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            readings_submitted: self.readings_submitted.load(Ordering::Relaxed),
            tasks_stopped: self.tasks_stopped.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total readings handed to the sink
    pub readings_submitted: u64,

    /// Tasks that observed shutdown and returned
    pub tasks_stopped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot() {
        let metrics = SourceMetrics::new();
        metrics.record_submitted();
        metrics.record_submitted();
        metrics.record_stopped();

        let snap = metrics.snapshot();
        assert_eq!(snap.readings_submitted, 2);
        assert_eq!(snap.tasks_stopped, 1);
    }
}
