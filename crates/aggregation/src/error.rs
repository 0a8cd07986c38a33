//! Aggregation error types

use contracts::ContractError;
use thiserror::Error;

/// Aggregation error
#[derive(Debug, Error)]
pub enum AggregationError {
    /// Worker thread could not be started
    #[error("failed to spawn aggregation worker: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Worker thread panicked
    #[error("aggregation worker panicked")]
    WorkerPanicked,

    /// Persistence failed mid-run
    #[error(transparent)]
    Persistence(#[from] ContractError),
}

/// Result alias
pub type Result<T> = std::result::Result<T, AggregationError>;
