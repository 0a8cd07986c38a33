//! AggregationWorker - the single consumer
//!
//! Drains the [`AggregationSink`] once per cycle, summarizes the batch,
//! delivers congestion alerts and persists one summary line per non-empty
//! cycle.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use contracts::{AlertSink, Reading, ShutdownSignal, SummarySink};
use observability::CycleMetricsAggregator;
use tracing::{debug, error, info, instrument};

use crate::error::{AggregationError, Result};
use crate::sink::AggregationSink;
use crate::stats::summarize;

/// Worker thread name
pub const WORKER_THREAD_NAME: &str = "aggregation-worker";

/// Outcome of one worker run
#[derive(Debug, Clone, Default)]
pub struct WorkerReport {
    /// Cycles run, empty ones included
    pub cycles: u64,

    /// Summaries handed to the persistence sink
    pub summaries_written: u64,

    /// Readings across all persisted summaries
    pub readings_aggregated: u64,

    /// Congestion alerts delivered
    pub alerts_raised: u64,

    /// In-memory cycle statistics
    pub metrics: CycleMetricsAggregator,
}

/// Sole consumer of an [`AggregationSink`]
pub struct AggregationWorker<P, A> {
    sink: Arc<AggregationSink>,
    persistence: P,
    alerts: A,
    interval: Duration,
    threshold: u32,
    shutdown: ShutdownSignal,
}

impl<P, A> AggregationWorker<P, A>
where
    P: SummarySink,
    A: AlertSink,
{
    /// Create a worker
    ///
    /// `persistence` must already be open; the worker never opens it.
    pub fn new(
        sink: Arc<AggregationSink>,
        persistence: P,
        alerts: A,
        interval: Duration,
        threshold: u32,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            sink,
            persistence,
            alerts,
            interval,
            threshold,
            shutdown,
        }
    }

    /// Run the loop on a dedicated named thread
    pub fn spawn(self) -> Result<WorkerHandle>
    where
        P: 'static,
        A: 'static,
    {
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || self.run())
            .map_err(AggregationError::SpawnFailed)?;

        Ok(WorkerHandle { handle })
    }

    /// Run the loop on the current thread until shutdown or a persistence failure
    ///
    /// After shutdown is observed, whatever is still buffered is drained once
    /// more and folded into the final cycle.
    #[instrument(
        name = "aggregation_worker",
        skip(self),
        fields(
            interval_ms = self.interval.as_millis() as u64,
            threshold = self.threshold,
            persistence = %self.persistence.name(),
        )
    )]
    pub fn run(mut self) -> Result<WorkerReport> {
        info!("aggregation worker started");
        let mut report = WorkerReport::default();

        loop {
            let mut batch = self.sink.drain_or_wait(self.interval);
            let stopping = self.shutdown.is_triggered();
            if stopping {
                batch.extend(self.sink.drain());
            }

            report.cycles += 1;
            if let Err(e) = self.process(report.cycles, &batch, &mut report) {
                error!(
                    sink = %self.persistence.name(),
                    cycle = report.cycles,
                    error = %e,
                    "persistence failed, aggregation stopped"
                );
                observability::record_persistence_failure(self.persistence.name());
                return Err(e);
            }

            if stopping {
                break;
            }
        }

        if let Err(e) = self.persistence.flush() {
            error!(sink = %self.persistence.name(), error = %e, "flush failed on shutdown");
            observability::record_persistence_failure(self.persistence.name());
            return Err(e.into());
        }

        info!(
            cycles = report.cycles,
            summaries = report.summaries_written,
            readings = report.readings_aggregated,
            alerts = report.alerts_raised,
            "aggregation worker stopped"
        );
        Ok(report)
    }

    fn process(&mut self, cycle: u64, batch: &[Reading], report: &mut WorkerReport) -> Result<()> {
        let Some(summary) = summarize(cycle, batch, self.threshold) else {
            debug!(cycle, "empty cycle");
            observability::record_empty_cycle();
            report.metrics.update_empty();
            return Ok(());
        };

        for alert in &summary.alerts {
            self.alerts.alert(alert);
            observability::record_alert(alert);
        }

        self.persistence.write(&summary)?;

        debug!(
            cycle,
            count = summary.count,
            average = summary.average,
            min = summary.min,
            max = summary.max,
            alerts = summary.alerts.len(),
            "cycle persisted"
        );
        observability::record_cycle(&summary);

        report.summaries_written += 1;
        report.readings_aggregated += summary.count as u64;
        report.alerts_raised += summary.alerts.len() as u64;
        report.metrics.update(&summary);
        Ok(())
    }
}

/// Join handle of a spawned worker
#[derive(Debug)]
pub struct WorkerHandle {
    handle: JoinHandle<Result<WorkerReport>>,
}

impl WorkerHandle {
    /// Whether the worker thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker to exit
    pub fn join(self) -> Result<WorkerReport> {
        self.handle
            .join()
            .map_err(|_| AggregationError::WorkerPanicked)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{CongestionAlert, ContractError, SourceId, Summary};
    use std::sync::Mutex;
    use std::time::Instant;

    #[derive(Clone, Default)]
    struct MockPersistence {
        lines: Arc<Mutex<Vec<String>>>,
        fail_on: Option<usize>,
    }

    impl SummarySink for MockPersistence {
        fn name(&self) -> &str {
            "mock"
        }

        fn write(&mut self, summary: &Summary) -> std::result::Result<(), ContractError> {
            let mut lines = self.lines.lock().unwrap();
            if self.fail_on == Some(lines.len()) {
                return Err(ContractError::sink_write("mock", "disk full"));
            }
            lines.push(summary.to_string());
            Ok(())
        }

        fn flush(&mut self) -> std::result::Result<(), ContractError> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MockAlerts {
        alerts: Arc<Mutex<Vec<CongestionAlert>>>,
    }

    impl AlertSink for MockAlerts {
        fn name(&self) -> &str {
            "mock"
        }

        fn alert(&mut self, alert: &CongestionAlert) {
            self.alerts.lock().unwrap().push(*alert);
        }
    }

    fn reading(source: u32, value: u32) -> Reading {
        Reading::now(SourceId::new(source), value)
    }

    fn worker(
        interval: Duration,
        persistence: MockPersistence,
        alerts: MockAlerts,
    ) -> (Arc<AggregationSink>, ShutdownSignal, AggregationWorker<MockPersistence, MockAlerts>) {
        let shutdown = ShutdownSignal::new();
        let sink = AggregationSink::new(&shutdown);
        let worker = AggregationWorker::new(
            Arc::clone(&sink),
            persistence,
            alerts,
            interval,
            80,
            shutdown.clone(),
        );
        (sink, shutdown, worker)
    }

    #[test]
    fn test_single_cycle_summary_and_alert() {
        let persistence = MockPersistence::default();
        let alerts = MockAlerts::default();
        let (sink, shutdown, worker) =
            worker(Duration::from_millis(50), persistence.clone(), alerts.clone());

        sink.submit(reading(0, 50));
        sink.submit(reading(1, 90));
        sink.submit(reading(2, 70));
        // stopping before the run folds everything into one final cycle
        shutdown.trigger();

        let report = worker.run().unwrap();

        assert_eq!(report.cycles, 1);
        assert_eq!(report.summaries_written, 1);
        assert_eq!(report.readings_aggregated, 3);
        assert_eq!(report.alerts_raised, 1);
        assert_eq!(
            *persistence.lines.lock().unwrap(),
            vec!["Avg: 70, Min: 50, Max: 90".to_string()]
        );
        assert_eq!(
            *alerts.alerts.lock().unwrap(),
            vec![CongestionAlert {
                source_id: SourceId::new(1),
                value: 90
            }]
        );
    }

    #[test]
    fn test_empty_cycles_write_nothing() {
        let persistence = MockPersistence::default();
        let (_sink, shutdown, worker) = worker(
            Duration::from_millis(5),
            persistence.clone(),
            MockAlerts::default(),
        );

        let handle = worker.spawn().unwrap();
        thread::sleep(Duration::from_millis(40));
        shutdown.trigger();
        let report = handle.join().unwrap();

        assert!(report.cycles >= 1);
        assert_eq!(report.summaries_written, 0);
        assert_eq!(report.metrics.empty_cycles, report.cycles);
        assert!(persistence.lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_shutdown_wakes_worker_promptly() {
        let (sink, shutdown, worker) = worker(
            Duration::from_secs(30),
            MockPersistence::default(),
            MockAlerts::default(),
        );
        let handle = worker.spawn().unwrap();

        sink.submit(reading(3, 60));
        thread::sleep(Duration::from_millis(20));

        let started = Instant::now();
        shutdown.trigger();
        let report = handle.join().unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(report.readings_aggregated, 1);
    }

    #[test]
    fn test_shutdown_costs_one_extra_drain() {
        let (sink, shutdown, worker) = worker(
            Duration::from_secs(30),
            MockPersistence::default(),
            MockAlerts::default(),
        );
        let handle = worker.spawn().unwrap();

        sink.submit(reading(0, 85));
        thread::sleep(Duration::from_millis(20));
        // still parked in its first wait
        assert_eq!(sink.drains(), 0);

        shutdown.trigger();
        let report = handle.join().unwrap();

        // the interrupted wait plus one final sweep
        assert_eq!(sink.drains(), 2);
        assert_eq!(report.cycles, 1);
        assert_eq!(report.readings_aggregated, 1);
        assert_eq!(report.alerts_raised, 1);
    }

    #[test]
    fn test_persistence_failure_stops_worker() {
        let persistence = MockPersistence {
            fail_on: Some(1),
            ..Default::default()
        };
        let (sink, shutdown, worker) = worker(
            Duration::from_millis(10),
            persistence.clone(),
            MockAlerts::default(),
        );
        let handle = worker.spawn().unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_finished() && Instant::now() < deadline {
            sink.submit(reading(0, 40));
            thread::sleep(Duration::from_millis(5));
        }

        let result = handle.join();
        assert!(matches!(
            result,
            Err(AggregationError::Persistence(ContractError::SinkWrite { .. }))
        ));
        assert_eq!(persistence.lines.lock().unwrap().len(), 1);

        // producers are unaffected and shutdown still works
        sink.submit(reading(0, 40));
        assert!(sink.pending() >= 1);
        assert!(!shutdown.is_triggered());
        shutdown.trigger();
    }

    #[test]
    fn test_readings_after_final_drain_stay_buffered() {
        let (sink, shutdown, worker) = worker(
            Duration::from_millis(10),
            MockPersistence::default(),
            MockAlerts::default(),
        );
        shutdown.trigger();
        let report = worker.run().unwrap();
        assert_eq!(report.cycles, 1);

        sink.submit(reading(0, 55));
        assert_eq!(sink.pending(), 1);
    }
}
