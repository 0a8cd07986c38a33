//! Sink traits - AggregationWorker output interfaces
//!
//! Defines the producer-side handoff and the abstract persistence and alert
//! collaborators.

use crate::{CongestionAlert, ContractError, Reading, Summary};

/// Producer-side handoff
///
/// Each source holds a shared handle to one implementation and calls
/// `submit` once per produced reading.
pub trait ReadingSink: Send + Sync {
    /// Hand over one reading. Never fails; may block only for mutual exclusion.
    fn submit(&self, reading: Reading);
}

/// Persistence target for per-cycle summaries
///
/// Called from the aggregation worker thread only.
pub trait SummarySink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist one summary
    ///
    /// # Errors
    /// Returns write error (should include context). The worker treats any
    /// error as fatal and does not retry.
    fn write(&mut self, summary: &Summary) -> Result<(), ContractError>;

    /// Flush buffered output (if any)
    fn flush(&mut self) -> Result<(), ContractError>;
}

/// Delivery channel for congestion alerts
pub trait AlertSink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one alert. Delivery is best-effort and cannot fail.
    fn alert(&mut self, alert: &CongestionAlert);
}

impl<S: SummarySink + ?Sized> SummarySink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write(&mut self, summary: &Summary) -> Result<(), ContractError> {
        (**self).write(summary)
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        (**self).flush()
    }
}

impl<A: AlertSink + ?Sized> AlertSink for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn alert(&mut self, alert: &CongestionAlert) {
        (**self).alert(alert)
    }
}
