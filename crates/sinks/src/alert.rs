//! Alert sinks - congestion alert delivery

use contracts::{AlertSink, AlertTarget, CongestionAlert};
use tracing::warn;

/// Writes `[ALERT] Sensor <id>: Congestion detected with density <v>` to stderr
#[derive(Debug, Default)]
pub struct ConsoleAlertSink;

impl ConsoleAlertSink {
    pub fn new() -> Self {
        Self
    }
}

impl AlertSink for ConsoleAlertSink {
    fn name(&self) -> &str {
        "console"
    }

    fn alert(&mut self, alert: &CongestionAlert) {
        eprintln!("[ALERT] {alert}");
    }
}

/// Emits one structured `warn!` event per alert
#[derive(Debug)]
pub struct LogAlertSink {
    name: String,
}

impl LogAlertSink {
    /// Create a new LogAlertSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogAlertSink {
    fn default() -> Self {
        Self::new("log")
    }
}

impl AlertSink for LogAlertSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn alert(&mut self, alert: &CongestionAlert) {
        warn!(
            sink = %self.name,
            source_id = %alert.source_id,
            value = alert.value,
            "congestion detected"
        );
    }
}

/// Delivers every alert to each inner sink in order
#[derive(Default)]
pub struct FanoutAlertSink {
    sinks: Vec<Box<dyn AlertSink>>,
}

impl FanoutAlertSink {
    pub fn new(sinks: Vec<Box<dyn AlertSink>>) -> Self {
        Self { sinks }
    }

    /// Number of inner sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl AlertSink for FanoutAlertSink {
    fn name(&self) -> &str {
        "fanout"
    }

    fn alert(&mut self, alert: &CongestionAlert) {
        for sink in &mut self.sinks {
            sink.alert(alert);
        }
    }
}

/// Build the alert sink for a configured target
pub fn build_alert_sink(target: AlertTarget) -> Box<dyn AlertSink> {
    match target {
        AlertTarget::Console => Box::new(ConsoleAlertSink::new()),
        AlertTarget::Log => Box::new(LogAlertSink::default()),
        AlertTarget::Both => Box::new(FanoutAlertSink::new(vec![
            Box::new(ConsoleAlertSink::new()),
            Box::new(LogAlertSink::default()),
        ])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryAlertSink;
    use contracts::SourceId;

    fn alert(source: u32, value: u32) -> CongestionAlert {
        CongestionAlert {
            source_id: SourceId::new(source),
            value,
        }
    }

    #[test]
    fn test_build_alert_sink_names() {
        assert_eq!(build_alert_sink(AlertTarget::Console).name(), "console");
        assert_eq!(build_alert_sink(AlertTarget::Log).name(), "log");
        assert_eq!(build_alert_sink(AlertTarget::Both).name(), "fanout");
    }

    #[test]
    fn test_fanout_delivers_to_every_sink() {
        let first = MemoryAlertSink::new();
        let second = MemoryAlertSink::new();
        let mut fanout =
            FanoutAlertSink::new(vec![Box::new(first.clone()), Box::new(second.clone())]);
        assert_eq!(fanout.len(), 2);

        fanout.alert(&alert(1, 91));
        fanout.alert(&alert(3, 85));

        assert_eq!(first.alerts(), vec![alert(1, 91), alert(3, 85)]);
        assert_eq!(second.alerts(), first.alerts());
    }

    #[test]
    fn test_log_and_console_sinks_accept_alerts() {
        let mut log = LogAlertSink::new("my_logger");
        assert_eq!(log.name(), "my_logger");
        log.alert(&alert(0, 99));

        let mut console = ConsoleAlertSink::new();
        console.alert(&alert(0, 99));
    }
}
