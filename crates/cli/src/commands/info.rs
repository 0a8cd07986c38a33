//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::PipelineConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::config;

/// Effective configuration plus derived values, for JSON output
#[derive(Serialize)]
struct ConfigInfo<'a> {
    #[serde(flatten)]
    config: &'a PipelineConfig,
    derived: DerivedInfo,
}

#[derive(Serialize)]
struct DerivedInfo {
    /// Expected readings per aggregation cycle
    readings_per_cycle: f64,
    /// Expected number of cycles in one run
    cycles_per_run: u64,
    warnings: Vec<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    match args.config {
        Some(ref path) => info!(config = %path.display(), "Loading configuration info"),
        None => info!("Showing built-in default configuration"),
    }

    let config = config::load_or_default(args.config.as_deref())?;

    if args.toml {
        let toml = config_loader::ConfigLoader::to_toml(&config)
            .context("Failed to serialize config as TOML")?;
        print!("{}", toml);
    } else if args.json {
        let info = ConfigInfo {
            config: &config,
            derived: derive_info(&config),
        };
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn derive_info(config: &PipelineConfig) -> DerivedInfo {
    let update_ms = config.sources.update_interval_ms.max(1) as f64;
    let aggregation_ms = config.aggregation.interval_ms.max(1);

    DerivedInfo {
        readings_per_cycle: f64::from(config.sources.count) * aggregation_ms as f64 / update_ms,
        cycles_per_run: config.run.duration_secs.saturating_mul(1000) / aggregation_ms,
        warnings: config_loader::collect_warnings(config),
    }
}

fn print_config_info(config: &PipelineConfig) {
    let derived = derive_info(config);

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║             Traffic Aggregator Configuration                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("🚦 Sources");
    println!("   ├─ Version: {:?}", config.version);
    println!("   ├─ Count: {} (ids 0..{})", config.sources.count, config.sources.count);
    println!("   ├─ Update interval: {} ms", config.sources.update_interval_ms);
    match config.sources.seed {
        Some(seed) => println!("   └─ Seed: {}", seed),
        None => println!("   └─ Seed: (entropy)"),
    }

    println!("\n⚙️  Aggregation");
    println!("   ├─ Interval: {} ms", config.aggregation.interval_ms);
    println!(
        "   ├─ Congestion threshold: > {}",
        config.aggregation.congestion_threshold
    );
    println!("   ├─ Readings per cycle: ~{:.1}", derived.readings_per_cycle);
    println!("   └─ Cycles per run: ~{}", derived.cycles_per_run);

    println!("\n📤 Output");
    println!("   ├─ Summary file: {}", config.output.log_path.display());
    println!("   ├─ Alerts: {:?}", config.output.alerts);
    println!("   └─ Run duration: {} s", config.run.duration_secs);

    if !derived.warnings.is_empty() {
        println!("\n⚠️  Warnings");
        for warning in &derived.warnings {
            println!("   - {}", warning);
        }
    }

    println!();
}
