//! # Traffic Aggregator CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 管道编排与生命周期管理
//! - 优雅关闭处理

mod cli;
mod commands;
mod config;
mod error;
mod pipeline;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_pipeline, run_validate};
use error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Traffic Aggregator CLI starting"
    );

    let result = match &cli.command {
        Commands::Run(args) => run_pipeline(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !is_reported(&e) {
                tracing::error!(error = %format!("{e:#}"), "Command failed");
            }
            ExitCode::FAILURE
        }
    }
}

/// Whether the pipeline already logged this error where it happened
fn is_reported(err: &anyhow::Error) -> bool {
    err.downcast_ref::<CliError>()
        .is_some_and(CliError::is_reported)
}

/// Initialize logging based on CLI options
///
/// The Prometheus exporter is installed later by `run`, once the port is known.
fn init_logging(cli: &Cli) -> Result<()> {
    let config = ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: None,
        ..Default::default()
    }
    .with_verbosity(cli.verbose, cli.quiet);

    observability::init_with_config(config)
}
