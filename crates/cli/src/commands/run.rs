//! `run` command implementation.

use anyhow::Result;
use contracts::PipelineConfig;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::config;
use crate::error::CliError;
use crate::pipeline::Pipeline;

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let config = config::resolve(args)?;

    for warning in config_loader::collect_warnings(&config) {
        warn!(warning = %warning, "Configuration warning");
    }

    info!(
        sources = config.sources.count,
        update_interval_ms = config.sources.update_interval_ms,
        aggregation_interval_ms = config.aggregation.interval_ms,
        threshold = config.aggregation.congestion_threshold,
        duration_secs = config.run.duration_secs,
        output = %config.output.log_path.display(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    info!("Starting pipeline...");
    let stats = Pipeline::new(config).run(shutdown_signal()).await?;

    info!(
        readings = stats.readings_submitted,
        lines = stats.lines_persisted,
        duration_secs = stats.duration.as_secs_f64(),
        readings_per_sec = format!("{:.2}", stats.readings_per_sec()),
        "Pipeline completed"
    );
    stats.print_summary();

    if let Some(failure) = stats.failure {
        return Err(CliError::persistence(failure).into());
    }

    info!("Traffic Aggregator finished");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
///
/// A handler that cannot be installed never fires; the run then ends on its
/// configured duration.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &PipelineConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Sources:");
    println!("  Count: {}", config.sources.count);
    println!("  Update interval: {} ms", config.sources.update_interval_ms);
    match config.sources.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: (entropy)"),
    }
    println!("\nAggregation:");
    println!("  Interval: {} ms", config.aggregation.interval_ms);
    println!("  Congestion threshold: {}", config.aggregation.congestion_threshold);
    println!("\nOutput:");
    println!("  Summary file: {}", config.output.log_path.display());
    println!("  Alerts: {:?}", config.output.alerts);
    println!("\nRun duration: {} s", config.run.duration_secs);
    println!();
}
