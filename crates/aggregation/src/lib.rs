//! # Aggregation
//!
//! Batch buffer and its single consumer.
//!
//! Responsibilities:
//! - Buffer readings from every source behind one lock ([`AggregationSink`])
//! - Drain the buffer once per cycle, or early on shutdown
//! - Compute count / total / average / min / max per batch
//! - Raise one alert per reading above the congestion threshold
//! - Persist one summary line per non-empty cycle
//!
//! ## Usage Example
//!
//! ```ignore
//! use aggregation::{AggregationSink, AggregationWorker};
//!
//! let sink = AggregationSink::new(&shutdown);
//! let worker = AggregationWorker::new(sink.clone(), file, alerts, interval, 80, shutdown.clone());
//! let handle = worker.spawn()?;
//! // ... sources submit into `sink` ...
//! shutdown.trigger();
//! let report = handle.join()?;
//! ```

mod error;
mod sink;
mod stats;
mod worker;

// Re-exports
pub use error::{AggregationError, Result};
pub use sink::AggregationSink;
pub use stats::summarize;
pub use worker::{AggregationWorker, WorkerHandle, WorkerReport, WORKER_THREAD_NAME};
