//! Summary - AggregationWorker output
//!
//! Statistics computed over one drained batch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SourceId;

/// Per-cycle summary
///
/// Only produced for non-empty batches, so `min <= average <= max` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Cycle sequence number (monotonically increasing, starts at 1)
    pub cycle: u64,

    /// Number of readings in the batch
    pub count: usize,

    /// Sum of all values
    pub total: u64,

    /// `total / count`, truncated
    pub average: u32,

    /// Smallest value
    pub min: u32,

    /// Largest value
    pub max: u32,

    /// One entry per reading above the congestion threshold
    pub alerts: Vec<CongestionAlert>,
}

/// Persistence line, `Avg: <int>, Min: <int>, Max: <int>`
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Avg: {}, Min: {}, Max: {}", self.average, self.min, self.max)
    }
}

/// Congestion alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CongestionAlert {
    /// Source that reported the reading
    pub source_id: SourceId,

    /// Offending value
    pub value: u32,
}

impl fmt::Display for CongestionAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sensor {}: Congestion detected with density {}",
            self.source_id, self.value
        )
    }
}
