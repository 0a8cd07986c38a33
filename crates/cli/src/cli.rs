//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::AlertTarget;
use std::path::PathBuf;

/// Traffic Aggregator - concurrent traffic density aggregation pipeline
#[derive(Parser, Debug)]
#[command(
    name = "traffic-aggregator",
    author,
    version,
    about = "Concurrent traffic density aggregation pipeline",
    long_about = "Runs a fleet of simulated traffic density sources, aggregates their readings\n\
                  every cycle into average / min / max summaries, raises congestion alerts\n\
                  and persists one summary line per cycle."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TRAFFIC_AGGREGATOR_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TRAFFIC_AGGREGATOR_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the aggregation pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); built-in defaults if omitted
    #[arg(short, long, env = "TRAFFIC_AGGREGATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run duration in seconds
    #[arg(short, long, env = "TRAFFIC_AGGREGATOR_DURATION")]
    pub duration: Option<u64>,

    /// Number of sources
    #[arg(long, env = "TRAFFIC_AGGREGATOR_SOURCES")]
    pub sources: Option<u32>,

    /// Source update interval in milliseconds
    #[arg(long, env = "TRAFFIC_AGGREGATOR_UPDATE_INTERVAL_MS")]
    pub update_interval_ms: Option<u64>,

    /// Aggregation interval in milliseconds
    #[arg(long, env = "TRAFFIC_AGGREGATOR_AGGREGATION_INTERVAL_MS")]
    pub aggregation_interval_ms: Option<u64>,

    /// Congestion threshold (alert when value is above it)
    #[arg(long, env = "TRAFFIC_AGGREGATOR_THRESHOLD")]
    pub threshold: Option<u32>,

    /// Summary log file
    #[arg(short, long, env = "TRAFFIC_AGGREGATOR_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Alert delivery target
    #[arg(long, value_enum, env = "TRAFFIC_AGGREGATOR_ALERTS")]
    pub alerts: Option<AlertArg>,

    /// Base seed for reproducible source values
    #[arg(long, env = "TRAFFIC_AGGREGATOR_SEED")]
    pub seed: Option<u64>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TRAFFIC_AGGREGATOR_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without running pipeline
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; built-in defaults if omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output as TOML (a ready-to-edit config file)
    #[arg(long, conflicts_with = "json")]
    pub toml: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Alert delivery target
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertArg {
    /// `[ALERT]` lines on stderr
    Console,
    /// Structured warn events
    Log,
    /// Both
    Both,
}

impl From<AlertArg> for AlertTarget {
    fn from(arg: AlertArg) -> Self {
        match arg {
            AlertArg::Console => Self::Console,
            AlertArg::Log => Self::Log,
            AlertArg::Both => Self::Both,
        }
    }
}
