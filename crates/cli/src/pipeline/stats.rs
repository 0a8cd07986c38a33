//! Run statistics.

use std::fmt;
use std::time::Duration;

use aggregation::WorkerReport;

/// Why the run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// Configured duration elapsed
    #[default]
    DurationElapsed,
    /// Ctrl+C / SIGTERM
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DurationElapsed => write!(f, "duration elapsed"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Wall-clock run time, shutdown included
    pub duration: Duration,

    /// What ended the run
    pub stop_reason: StopReason,

    /// Sources joined
    pub sources: usize,

    /// Readings handed to the sink
    pub readings_submitted: u64,

    /// Readings still buffered after the final drain
    pub unaggregated: usize,

    /// Lines written to the summary file
    pub lines_persisted: u64,

    /// Worker outcome, `None` if it never ran or failed
    pub worker: Option<WorkerReport>,

    /// First persistence failure, if any; logged where it happened
    pub failure: Option<String>,
}

impl RunStats {
    /// Readings per second across all sources
    pub fn readings_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.readings_submitted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Run Statistics                            ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s ({})", self.duration.as_secs_f64(), self.stop_reason);
        println!("   ├─ Sources: {}", self.sources);
        println!("   ├─ Readings submitted: {}", self.readings_submitted);
        println!("   ├─ Readings/s: {:.2}", self.readings_per_sec());
        println!("   ├─ Summary lines written: {}", self.lines_persisted);
        println!("   └─ Unaggregated at exit: {}", self.unaggregated);

        if let Some(ref worker) = self.worker {
            let summary = worker.metrics.summary();

            println!("\n📈 Aggregation");
            println!(
                "   ├─ Cycles: {} ({} empty)",
                summary.total_cycles, summary.empty_cycles
            );
            println!("   ├─ Readings aggregated: {}", summary.total_readings);
            println!(
                "   ├─ Congestion alerts: {} ({:.2}%)",
                summary.total_alerts, summary.alert_rate
            );
            println!("   ├─ Cycle average: {}", summary.cycle_average);
            println!("   └─ Batch size: {}", summary.batch_size);

            if !summary.source_alert_counts.is_empty() {
                println!("\n⚠️  Alerts per Source");
                for (source, count) in &summary.source_alert_counts {
                    println!("   ├─ Sensor {}: {}", source, count);
                }
            }
        }

        if self.failure.is_some() {
            println!("\n❌ Persistence failed, summary file is incomplete");
        }

        println!();
    }
}
