//! FileSummarySink - one summary line per cycle on disk

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use contracts::{ContractError, Summary, SummarySink};
use tracing::{debug, info, instrument};

use crate::metrics::SinkMetrics;

/// Sink that appends `Avg: <int>, Min: <int>, Max: <int>` lines to a file
///
/// The file is truncated when the sink is created and flushed after every
/// line, so a crash loses at most the line being written.
#[derive(Debug)]
pub struct FileSummarySink {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    metrics: Arc<SinkMetrics>,
}

impl FileSummarySink {
    /// Create or truncate `path`
    ///
    /// # Errors
    /// [`ContractError::SinkOpen`] if the file cannot be created. Not logged
    /// here; the caller decides how to report it.
    #[instrument(
        name = "file_summary_sink_create",
        skip(path),
        fields(target = %path.as_ref().display())
    )]
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref().to_path_buf();
        let name = "file".to_string();

        let file = File::create(&path)
            .map_err(|e| ContractError::sink_open(&name, &path, e.to_string()))?;

        info!(sink = %name, path = %path.display(), "summary file opened");
        Ok(Self {
            name,
            path,
            writer: BufWriter::new(file),
            metrics: Arc::new(SinkMetrics::new()),
        })
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shared metrics, readable after the sink moved into the worker
    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

impl SummarySink for FileSummarySink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_summary_sink_write",
        skip(self, summary),
        fields(sink = %self.name, cycle = summary.cycle)
    )]
    fn write(&mut self, summary: &Summary) -> Result<(), ContractError> {
        let line = summary.to_string();
        match self.write_line(&line) {
            Ok(()) => {
                self.metrics.record_write(line.len() + 1);
                debug!(line = %line, "summary written");
                Ok(())
            }
            Err(e) => {
                self.metrics.inc_failure_count();
                Err(ContractError::sink_write(&self.name, e.to_string()))
            }
        }
    }

    #[instrument(name = "file_summary_sink_flush", skip(self))]
    fn flush(&mut self) -> Result<(), ContractError> {
        self.writer
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn summary(cycle: u64, average: u32, min: u32, max: u32) -> Summary {
        Summary {
            cycle,
            count: 3,
            total: u64::from(average) * 3,
            average,
            min,
            max,
            alerts: vec![],
        }
    }

    #[test]
    fn test_file_sink_writes_one_line_per_summary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("traffic_log.txt");

        let mut sink = FileSummarySink::create(&path).unwrap();
        sink.write(&summary(1, 70, 50, 90)).unwrap();
        sink.write(&summary(2, 33, 10, 61)).unwrap();

        // flushed per line, visible before flush()/drop
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Avg: 70, Min: 50, Max: 90\nAvg: 33, Min: 10, Max: 61\n");
        assert_eq!(sink.metrics().write_count(), 2);
    }

    #[test]
    fn test_file_sink_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("traffic_log.txt");
        fs::write(&path, "stale\nlines\n").unwrap();

        let sink = FileSummarySink::create(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_file_sink_open_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("traffic_log.txt");

        let err = FileSummarySink::create(&path).unwrap_err();
        assert!(matches!(err, ContractError::SinkOpen { .. }));
        assert!(err.is_persistence());
    }
}
