//! PipelineConfig - Config Loader output
//!
//! Describes the full pipeline: source fleet, aggregation cadence, output
//! routing and run length. Every field has a default matching the fixed
//! constants below, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Number of independent sources
pub const SENSOR_COUNT: u32 = 5;

/// Tick period of every source
pub const SENSOR_UPDATE_INTERVAL: Duration = Duration::from_millis(1500);

/// Aggregation cycle period
pub const AGGREGATION_INTERVAL: Duration = Duration::from_millis(3000);

/// Values strictly above this raise a congestion alert
pub const CONGESTION_THRESHOLD: u32 = 80;

/// Default run length before shutdown is triggered
pub const RUN_DURATION: Duration = Duration::from_secs(60);

/// Default persistence target
pub const DEFAULT_LOG_PATH: &str = "traffic_log.txt";

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Source fleet
    #[serde(default)]
    #[validate(nested)]
    pub sources: SourceConfig,

    /// Aggregation stage
    #[serde(default)]
    #[validate(nested)]
    pub aggregation: AggregationConfig,

    /// Output routing
    #[serde(default)]
    #[validate(nested)]
    pub output: OutputConfig,

    /// Run control
    #[serde(default)]
    #[validate(nested)]
    pub run: RunConfig,
}

/// Source fleet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    /// Number of sources, ids are `0..count`
    #[serde(default = "default_source_count")]
    #[validate(range(min = 1, max = 1024))]
    pub count: u32,

    /// Tick period in milliseconds
    #[serde(default = "default_update_interval_ms")]
    #[validate(range(min = 1))]
    pub update_interval_ms: u64,

    /// Base seed for reproducible values (None = OS entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SourceConfig {
    /// Tick period
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            count: default_source_count(),
            update_interval_ms: default_update_interval_ms(),
            seed: None,
        }
    }
}

fn default_source_count() -> u32 {
    SENSOR_COUNT
}

fn default_update_interval_ms() -> u64 {
    SENSOR_UPDATE_INTERVAL.as_millis() as u64
}

/// Aggregation stage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AggregationConfig {
    /// Cycle period in milliseconds
    #[serde(default = "default_aggregation_interval_ms")]
    #[validate(range(min = 1))]
    pub interval_ms: u64,

    /// Alert when a value is strictly greater than this
    #[serde(default = "default_congestion_threshold")]
    pub congestion_threshold: u32,
}

impl AggregationConfig {
    /// Cycle period
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_aggregation_interval_ms(),
            congestion_threshold: default_congestion_threshold(),
        }
    }
}

fn default_aggregation_interval_ms() -> u64 {
    AGGREGATION_INTERVAL.as_millis() as u64
}

fn default_congestion_threshold() -> u32 {
    CONGESTION_THRESHOLD
}

/// Output routing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OutputConfig {
    /// Summary log file, truncated at startup
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Where congestion alerts go
    #[serde(default)]
    pub alerts: AlertTarget,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            alerts: AlertTarget::default(),
        }
    }
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

/// Alert delivery target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTarget {
    /// `[ALERT]` lines on stderr
    #[default]
    Console,
    /// Structured `warn!` events
    Log,
    /// Both of the above
    Both,
}

/// Run control configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RunConfig {
    /// Seconds before shutdown is triggered
    #[serde(default = "default_run_duration_secs")]
    #[validate(range(min = 1))]
    pub duration_secs: u64,
}

impl RunConfig {
    /// Run length
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_run_duration_secs(),
        }
    }
}

fn default_run_duration_secs() -> u64 {
    RUN_DURATION.as_secs()
}
