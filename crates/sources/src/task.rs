//! SourceTask - one producer thread
//!
//! Sleeps a fixed interval, checks the shutdown flag, then hands exactly one
//! reading to the sink. Shutdown latency is bounded by one interval.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use contracts::{Reading, ReadingSink, ShutdownSignal, SourceId};
use tracing::{debug, trace};

use crate::generator::ReadingGenerator;
use crate::metrics::SourceMetrics;

/// Outcome of one task after it observed shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceReport {
    /// Source that ran
    pub source_id: SourceId,

    /// Readings submitted over the run
    pub submitted: u64,
}

/// Fixed-interval producer
pub struct SourceTask<G, S: ?Sized> {
    source_id: SourceId,
    interval: Duration,
    generator: G,
    sink: Arc<S>,
    shutdown: ShutdownSignal,
    metrics: Arc<SourceMetrics>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl<G, S> SourceTask<G, S>
where
    G: ReadingGenerator,
    S: ReadingSink + ?Sized,
{
    /// Create a task; nothing runs until [`SourceTask::run`]
    pub fn new(
        source_id: SourceId,
        interval: Duration,
        generator: G,
        sink: Arc<S>,
        shutdown: ShutdownSignal,
        metrics: Arc<SourceMetrics>,
    ) -> Self {
        Self {
            source_id,
            interval,
            generator,
            sink,
            shutdown,
            metrics,
            last_timestamp: None,
        }
    }

    /// Source this task produces for
    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Run until shutdown is observed, on the calling thread
    pub fn run(mut self) -> SourceReport {
        let mut submitted = 0u64;

        debug!(
            source_id = %self.source_id,
            interval_ms = self.interval.as_millis() as u64,
            "source task started"
        );

        loop {
            thread::sleep(self.interval);
            if self.shutdown.is_triggered() {
                break;
            }

            let reading = self.next_reading();
            self.sink.submit(reading);
            submitted += 1;

            self.metrics.record_submitted();
            observability::record_reading_submitted(self.source_id);

            trace!(
                source_id = %self.source_id,
                value = reading.value,
                submitted,
                "reading submitted"
            );
        }

        self.metrics.record_stopped();
        debug!(source_id = %self.source_id, submitted, "source task stopped");

        SourceReport {
            source_id: self.source_id,
            submitted,
        }
    }

    /// Produce one reading; timestamps never go backwards for this source
    fn next_reading(&mut self) -> Reading {
        let now = Utc::now();
        let timestamp = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(timestamp);

        Reading::at(self.source_id, self.generator.next_value(), timestamp)
    }
}
