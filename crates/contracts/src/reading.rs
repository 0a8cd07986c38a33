//! Reading - SourceTask output
//!
//! One timestamped measurement from one source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SourceId;

/// Lowest value a source can produce
pub const READING_MIN: u32 = 10;

/// Highest value a source can produce
pub const READING_MAX: u32 = 100;

/// Traffic density reading
///
/// Immutable once produced. The value range `[READING_MIN, READING_MAX]` is
/// guaranteed by the generator and not re-checked downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Producing source
    pub source_id: SourceId,

    /// Density value
    pub value: u32,

    /// Wall-clock time of generation
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Create a reading stamped with the current time
    pub fn now(source_id: SourceId, value: u32) -> Self {
        Self {
            source_id,
            value,
            timestamp: Utc::now(),
        }
    }

    /// Create a reading with an explicit timestamp
    pub fn at(source_id: SourceId, value: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            source_id,
            value,
            timestamp,
        }
    }
}

/// Readings accumulated between two drains
pub type Batch = Vec<Reading>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_serde() {
        let reading = Reading::now(SourceId::new(1), 42);
        let json = serde_json::to_string(&reading).unwrap();
        let parsed: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reading);
    }
}
