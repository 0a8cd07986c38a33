//! # Sinks
//!
//! 聚合结果输出模块。
//!
//! 负责：
//! - 每个非空周期写一行摘要到文件
//! - 拥堵告警投递 (stderr / tracing)
//! - 测试用内存 sink

mod alert;
mod file;
mod memory;
mod metrics;

pub use alert::{build_alert_sink, ConsoleAlertSink, FanoutAlertSink, LogAlertSink};
pub use contracts::{AlertSink, SummarySink};
pub use file::FileSummarySink;
pub use memory::{MemoryAlertSink, MemorySummarySink};
pub use metrics::{MetricsSnapshot, SinkMetrics};
