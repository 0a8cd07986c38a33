//! Effective configuration: file (or defaults) plus CLI overrides.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::PipelineConfig;
use tracing::info;

use crate::cli::RunArgs;
use crate::error::CliError;

/// Load `path`, or fall back to built-in defaults when no file is given
pub fn load_or_default(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        info!("No configuration file given, using built-in defaults");
        return Ok(PipelineConfig::default());
    };

    if !path.exists() {
        return Err(CliError::config_not_found(path).into());
    }

    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Apply `run` flag overrides, then re-validate the result
pub fn resolve(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = load_or_default(args.config.as_deref())?;
    apply_overrides(&mut config, args);

    config_loader::ConfigLoader::validate(&config)
        .map_err(|e| CliError::config_validation(e.to_string()))?;

    Ok(config)
}

fn apply_overrides(config: &mut PipelineConfig, args: &RunArgs) {
    if let Some(secs) = args.duration {
        info!(secs, "Overriding run duration from CLI");
        config.run.duration_secs = secs;
    }
    if let Some(count) = args.sources {
        info!(count, "Overriding source count from CLI");
        config.sources.count = count;
    }
    if let Some(ms) = args.update_interval_ms {
        info!(ms, "Overriding update interval from CLI");
        config.sources.update_interval_ms = ms;
    }
    if let Some(ms) = args.aggregation_interval_ms {
        info!(ms, "Overriding aggregation interval from CLI");
        config.aggregation.interval_ms = ms;
    }
    if let Some(threshold) = args.threshold {
        info!(threshold, "Overriding congestion threshold from CLI");
        config.aggregation.congestion_threshold = threshold;
    }
    if let Some(ref path) = args.output {
        info!(path = %path.display(), "Overriding output path from CLI");
        config.output.log_path = path.clone();
    }
    if let Some(alerts) = args.alerts {
        config.output.alerts = alerts.into();
    }
    if args.seed.is_some() {
        config.sources.seed = args.seed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AlertArg;
    use contracts::AlertTarget;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(&RunArgs::default()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aggregator.toml");
        std::fs::write(
            &path,
            "[sources]\ncount = 2\n\n[aggregation]\ncongestion_threshold = 70\n",
        )
        .unwrap();

        let args = RunArgs {
            config: Some(path),
            sources: Some(8),
            alerts: Some(AlertArg::Log),
            output: Some(PathBuf::from("custom.txt")),
            seed: Some(42),
            ..Default::default()
        };
        let config = resolve(&args).unwrap();

        assert_eq!(config.sources.count, 8);
        assert_eq!(config.aggregation.congestion_threshold, 70);
        assert_eq!(config.output.alerts, AlertTarget::Log);
        assert_eq!(config.output.log_path, PathBuf::from("custom.txt"));
        assert_eq!(config.sources.seed, Some(42));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = RunArgs {
            sources: Some(0),
            ..Default::default()
        };
        let err = resolve(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_or_default(Some(Path::new("/definitely/missing.toml"))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ConfigNotFound { .. })
        ));
    }
}
