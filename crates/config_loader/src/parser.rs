//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式，输出 `PipelineConfig`。
//! 未出现的段与字段使用默认值 (见 `contracts::config`)。

use std::fmt;

use contracts::{ContractError, PipelineConfig};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式 (大小写不敏感)
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => write!(f, "TOML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<PipelineConfig, ContractError> {
    toml::from_str(content).map_err(|e| pipeline_parse_error(ConfigFormat::Toml, e))
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<PipelineConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| pipeline_parse_error(ConfigFormat::Json, e))
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<PipelineConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

/// 反序列化错误 -> ConfigParse，保留原始错误作为 source
fn pipeline_parse_error<E>(format: ConfigFormat, err: E) -> ContractError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ContractError::ConfigParse {
        message: format!("invalid pipeline config ({format}): {err}"),
        source: Some(Box::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::AlertTarget;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[sources]
count = 3
update_interval_ms = 500

[aggregation]
interval_ms = 1000
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.sources.count, 3);
        assert_eq!(config.sources.update_interval_ms, 500);
        assert_eq!(config.aggregation.interval_ms, 1000);
        // untouched sections keep their defaults
        assert_eq!(config.aggregation.congestion_threshold, 80);
        assert_eq!(config.run.duration_secs, 60);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "sources": { "count": 2, "seed": 42 },
            "output": { "log_path": "out/summary.txt", "alerts": "log" }
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.sources.seed, Some(42));
        assert_eq!(config.output.alerts, AlertTarget::Log);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
        assert!(err.to_string().contains("invalid pipeline config (TOML)"));
    }

    #[test]
    fn test_parse_json_error_keeps_source() {
        let err = parse(r#"{"sources": {"count": -1}}"#, ConfigFormat::Json).unwrap_err();
        assert!(err.to_string().contains("invalid pipeline config (JSON)"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_parse_wrong_type() {
        let content = r#"
[sources]
count = "five"
"#;
        assert!(matches!(
            parse_toml(content),
            Err(ContractError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
