//! 配置校验模块
//!
//! 校验规则：
//! - 字段范围 (count >= 1, interval_ms >= 1, duration_secs >= 1)，由 `validator` derive 完成
//! - congestion_threshold 位于 [READING_MIN, READING_MAX) 内
//! - log_path 非空
//!
//! 非致命问题通过 [`collect_warnings`] 报告。

use contracts::{ContractError, PipelineConfig, READING_MAX, READING_MIN};
use ::validator::Validate;

/// 校验 PipelineConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &PipelineConfig) -> Result<(), ContractError> {
    validate_ranges(config)?;
    validate_threshold(config)?;
    validate_output(config)?;
    Ok(())
}

/// 字段范围校验
fn validate_ranges(config: &PipelineConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|e| ContractError::config_validation("config", e.to_string()))
}

/// 校验告警阈值
fn validate_threshold(config: &PipelineConfig) -> Result<(), ContractError> {
    let threshold = config.aggregation.congestion_threshold;
    if !(READING_MIN..READING_MAX).contains(&threshold) {
        return Err(ContractError::config_validation(
            "aggregation.congestion_threshold",
            format!(
                "congestion_threshold must be in [{READING_MIN}, {READING_MAX}), got {threshold}"
            ),
        ));
    }
    Ok(())
}

/// 校验输出配置
fn validate_output(config: &PipelineConfig) -> Result<(), ContractError> {
    if config.output.log_path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "output.log_path",
            "log_path cannot be empty",
        ));
    }
    Ok(())
}

/// 收集非致命配置警告
pub fn collect_warnings(config: &PipelineConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.aggregation.interval_ms < config.sources.update_interval_ms {
        warnings.push(format!(
            "aggregation.interval_ms ({}) is shorter than sources.update_interval_ms ({}) - many cycles will be empty",
            config.aggregation.interval_ms, config.sources.update_interval_ms
        ));
    }

    if config.run.duration_secs.saturating_mul(1000) < config.aggregation.interval_ms {
        warnings.push(format!(
            "run.duration_secs ({}) is shorter than one aggregation cycle - only the final flush will run",
            config.run.duration_secs
        ));
    }

    warnings
}
