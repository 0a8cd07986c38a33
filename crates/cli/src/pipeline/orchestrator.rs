//! Pipeline orchestrator - wires sources, sink, worker and shutdown.
//!
//! Core components run on plain OS threads; tokio is only used here to await
//! the run duration or an external stop, and to join those threads without
//! blocking the runtime.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use aggregation::{
    AggregationError, AggregationSink, AggregationWorker, WorkerHandle, WorkerReport,
};
use anyhow::{Context, Result};
use contracts::{PipelineConfig, ShutdownSignal};
use sinks::{build_alert_sink, FileSummarySink, SinkMetrics};
use sources::SourcePool;
use tracing::{error, info, instrument, warn};

use super::{RunStats, StopReason};
use crate::error::CliError;

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run until the configured duration elapses or `interrupt` resolves
    ///
    /// Persistence failures do not abort the run: sources keep producing
    /// until the stop condition, every thread is joined, and the failure is
    /// reported in [`RunStats::failure`].
    #[instrument(
        name = "pipeline_run",
        skip_all,
        fields(
            sources = self.config.sources.count,
            duration_secs = self.config.run.duration_secs,
        )
    )]
    pub async fn run<F>(self, interrupt: F) -> Result<RunStats>
    where
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let config = &self.config;

        let shutdown = ShutdownSignal::new();
        let sink = AggregationSink::new(&shutdown);
        let mut failure = None;

        // Open persistence before anything runs; the worker is skipped if it fails
        let (worker, file_metrics) = match FileSummarySink::create(&config.output.log_path) {
            Ok(file) => {
                let file_metrics = file.metrics();
                let worker = AggregationWorker::new(
                    Arc::clone(&sink),
                    file,
                    build_alert_sink(config.output.alerts),
                    config.aggregation.interval(),
                    config.aggregation.congestion_threshold,
                    shutdown.clone(),
                )
                .spawn()
                .context("Failed to start aggregation worker")?;
                (Some(worker), Some(file_metrics))
            }
            Err(e) => {
                error!(error = %e, "Summary file unavailable, aggregation disabled for this run");
                failure = Some(e.to_string());
                (None, None)
            }
        };

        let pool = match SourcePool::spawn(&config.sources, Arc::clone(&sink), &shutdown) {
            Ok(pool) => pool,
            Err(e) => {
                shutdown.trigger();
                if let Some(worker) = worker {
                    abandon_worker(worker).await;
                }
                return Err(e).context("Failed to start sources");
            }
        };
        let source_metrics = pool.metrics();

        info!(
            sources = pool.len(),
            update_interval_ms = config.sources.update_interval_ms,
            aggregation_interval_ms = config.aggregation.interval_ms,
            threshold = config.aggregation.congestion_threshold,
            output = %config.output.log_path.display(),
            "Pipeline running"
        );

        let stop_reason = tokio::select! {
            _ = tokio::time::sleep(config.run.duration()) => StopReason::DurationElapsed,
            _ = interrupt => StopReason::Interrupted,
        };

        info!(reason = %stop_reason, "Shutting down pipeline...");
        shutdown.trigger();

        let (sources_result, worker_result) =
            tokio::task::spawn_blocking(move || join_all(pool, worker))
                .await
                .map_err(|e| CliError::pipeline_execution(format!("join task failed: {e}")))?;

        let source_reports = sources_result.context("Source task failed")?;

        let worker_report = match worker_result {
            Some(Ok(report)) => Some(report),
            Some(Err(e)) => {
                failure.get_or_insert_with(|| e.to_string());
                None
            }
            None => None,
        };

        let stats = RunStats {
            duration: start_time.elapsed(),
            stop_reason,
            sources: source_reports.len(),
            readings_submitted: source_metrics.snapshot().readings_submitted,
            unaggregated: sink.pending(),
            lines_persisted: file_metrics.as_deref().map_or(0, SinkMetrics::write_count),
            worker: worker_report,
            failure,
        };

        if stats.unaggregated > 0 {
            warn!(
                readings = stats.unaggregated,
                "Readings left in the sink after the final drain"
            );
        }

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            readings = stats.readings_submitted,
            lines = stats.lines_persisted,
            "Pipeline shutdown complete"
        );

        Ok(stats)
    }
}

/// Join a worker whose run is being abandoned, logging how it ended
///
/// A persistence failure was already reported by the worker itself.
async fn abandon_worker(worker: WorkerHandle) -> Option<WorkerReport> {
    match tokio::task::spawn_blocking(move || worker.join()).await {
        Ok(Ok(report)) => {
            info!(
                cycles = report.cycles,
                readings = report.readings_aggregated,
                "Aggregation worker stopped before the run started"
            );
            Some(report)
        }
        Ok(Err(AggregationError::Persistence(_))) => None,
        Ok(Err(e)) => {
            warn!(error = %e, "Aggregation worker failed while stopping");
            None
        }
        Err(e) => {
            warn!(error = %e, "Aggregation worker join task failed");
            None
        }
    }
}

/// Join every source first, then the worker
fn join_all(
    pool: SourcePool,
    worker: Option<WorkerHandle>,
) -> (
    sources::Result<Vec<sources::SourceReport>>,
    Option<Result<WorkerReport, AggregationError>>,
) {
    let sources = pool.join();
    let worker = worker.map(WorkerHandle::join);
    (sources, worker)
}
