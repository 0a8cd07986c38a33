//! # Sources
//!
//! Reading producers.
//!
//! Responsibilities:
//! - Generate bounded density values per source
//! - Run one fixed-interval task per source on its own thread
//! - Hand every reading to a shared [`contracts::ReadingSink`]
//! - Join every task after shutdown
//!
//! ## Usage Example
//!
//! ```ignore
//! use sources::SourcePool;
//! use contracts::{ShutdownSignal, SourceConfig};
//!
//! let shutdown = ShutdownSignal::new();
//! let pool = SourcePool::spawn(&SourceConfig::default(), sink.clone(), &shutdown)?;
//! // ... run ...
//! shutdown.trigger();
//! let reports = pool.join()?;
//! ```

mod error;
mod generator;
mod metrics;
mod pool;
mod task;

// Re-exports
pub use error::{Result, SourceError};
pub use generator::{ReadingGenerator, ScriptedGenerator, UniformGenerator};
pub use metrics::{MetricsSnapshot, SourceMetrics};
pub use pool::SourcePool;
pub use task::{SourceReport, SourceTask};
