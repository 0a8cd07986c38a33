//! In-memory sinks, shared through `Arc<Mutex<_>>` so tests can inspect them
//! after the worker took ownership of a clone.

use std::sync::{Arc, Mutex, PoisonError};

use contracts::{AlertSink, CongestionAlert, ContractError, Summary, SummarySink};

/// Collects summaries
#[derive(Debug, Clone, Default)]
pub struct MemorySummarySink {
    summaries: Arc<Mutex<Vec<Summary>>>,
}

impl MemorySummarySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summaries written so far
    pub fn summaries(&self) -> Vec<Summary> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Persistence lines, as a file sink would have written them
    pub fn lines(&self) -> Vec<String> {
        self.summaries().iter().map(ToString::to_string).collect()
    }
}

impl SummarySink for MemorySummarySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&mut self, summary: &Summary) -> Result<(), ContractError> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}

/// Collects alerts
#[derive(Debug, Clone, Default)]
pub struct MemoryAlertSink {
    alerts: Arc<Mutex<Vec<CongestionAlert>>>,
}

impl MemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts delivered so far
    pub fn alerts(&self) -> Vec<CongestionAlert> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AlertSink for MemoryAlertSink {
    fn name(&self) -> &str {
        "memory"
    }

    fn alert(&mut self, alert: &CongestionAlert) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*alert);
    }
}
