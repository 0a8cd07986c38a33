//! SourcePool - owns every SourceTask thread
//!
//! Spawns one named OS thread per source and keeps the join handles so the
//! orchestrator can wait for every producer before declaring the run over.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use contracts::{ReadingSink, ShutdownSignal, SourceConfig, SourceId};
use tracing::{error, info, instrument};

use crate::error::{Result, SourceError};
use crate::generator::{ReadingGenerator, UniformGenerator};
use crate::metrics::SourceMetrics;
use crate::task::{SourceReport, SourceTask};

/// Running source fleet
pub struct SourcePool {
    handles: Vec<(SourceId, JoinHandle<SourceReport>)>,
    metrics: Arc<SourceMetrics>,
}

impl SourcePool {
    /// Spawn `config.count` sources with uniform generators
    pub fn spawn<S>(config: &SourceConfig, sink: Arc<S>, shutdown: &ShutdownSignal) -> Result<Self>
    where
        S: ReadingSink + ?Sized + 'static,
    {
        let seed = config.seed;
        Self::spawn_with(
            config.count,
            config.update_interval(),
            sink,
            shutdown,
            |source_id| UniformGenerator::for_source(source_id, seed),
        )
    }

    /// Spawn `count` sources, building one generator per source id
    ///
    /// If a thread fails to spawn, shutdown is triggered so the already
    /// running tasks wind down, and they are joined before returning the error.
    #[instrument(name = "source_pool_spawn", skip(sink, shutdown, make_generator))]
    pub fn spawn_with<S, G, F>(
        count: u32,
        interval: Duration,
        sink: Arc<S>,
        shutdown: &ShutdownSignal,
        mut make_generator: F,
    ) -> Result<Self>
    where
        S: ReadingSink + ?Sized + 'static,
        G: ReadingGenerator + 'static,
        F: FnMut(SourceId) -> G,
    {
        let metrics = Arc::new(SourceMetrics::new());
        let mut pool = Self {
            handles: Vec::with_capacity(count as usize),
            metrics: Arc::clone(&metrics),
        };

        for id in 0..count {
            let source_id = SourceId::new(id);
            let task = SourceTask::new(
                source_id,
                interval,
                make_generator(source_id),
                Arc::clone(&sink),
                shutdown.clone(),
                Arc::clone(&metrics),
            );

            let spawned = thread::Builder::new()
                .name(source_id.thread_name())
                .spawn(move || task.run());

            match spawned {
                Ok(handle) => pool.handles.push((source_id, handle)),
                Err(e) => {
                    error!(source_id = %source_id, error = %e, "failed to spawn source task");
                    shutdown.trigger();
                    let _ = pool.join();
                    return Err(SourceError::SpawnFailed {
                        source_id,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(count, interval_ms = interval.as_millis() as u64, "source pool started");
        Ok(pool)
    }

    /// Number of running tasks
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the pool holds no tasks
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Shared metrics
    pub fn metrics(&self) -> Arc<SourceMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Wait for every task to observe shutdown and return
    ///
    /// Blocks until all threads have exited, even if one of them panicked;
    /// the first panic is reported after the rest are joined.
    #[instrument(name = "source_pool_join", skip(self), fields(tasks = self.handles.len()))]
    pub fn join(self) -> Result<Vec<SourceReport>> {
        let mut reports = Vec::with_capacity(self.handles.len());
        let mut first_panic = None;

        for (source_id, handle) in self.handles {
            match handle.join() {
                Ok(report) => reports.push(report),
                Err(_) => {
                    error!(source_id = %source_id, "source task panicked");
                    first_panic.get_or_insert(SourceError::TaskPanicked { source_id });
                }
            }
        }

        match first_panic {
            Some(err) => Err(err),
            None => {
                info!(tasks = reports.len(), "source pool joined");
                Ok(reports)
            }
        }
    }
}
