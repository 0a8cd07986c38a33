//! SourceId - Copyable data source identifier
//!
//! Sources are numbered `0..sensor_count` at startup and keep their id for
//! the lifetime of the run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Data source identifier.
///
/// A thin newtype over `u32` so source ids cannot be confused with reading
/// values, which share the same integer representation.
///
/// # Examples
/// ```
/// use contracts::SourceId;
///
/// let id = SourceId::new(3);
/// assert_eq!(id.get(), 3);
/// assert_eq!(id.to_string(), "3");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(u32);

impl SourceId {
    /// Create a new SourceId.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the underlying integer.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Thread name used for the task driving this source.
    pub fn thread_name(self) -> String {
        format!("source-{}", self.0)
    }
}

impl From<u32> for SourceId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<SourceId> for u32 {
    #[inline]
    fn from(id: SourceId) -> Self {
        id.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}
