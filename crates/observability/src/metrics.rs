//! 聚合管道指标收集模块
//!
//! 基于 Summary 收集和统计每个聚合周期的运行指标。

use std::collections::HashMap;

use contracts::{CongestionAlert, SourceId, Summary};
use metrics::{counter, gauge, histogram};

/// 从 Summary 记录指标
///
/// 每个非空聚合周期调用一次。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_cycle;
///
/// if let Some(summary) = summarize(cycle, &batch, threshold) {
///     record_cycle(&summary);
/// }
/// ```
pub fn record_cycle(summary: &Summary) {
    counter!("traffic_cycles_total", "outcome" => "summary").increment(1);
    gauge!("traffic_last_cycle").set(summary.cycle as f64);

    histogram!("traffic_cycle_readings").record(summary.count as f64);
    counter!("traffic_readings_aggregated_total").increment(summary.count as u64);

    gauge!("traffic_cycle_average").set(f64::from(summary.average));
    gauge!("traffic_cycle_min").set(f64::from(summary.min));
    gauge!("traffic_cycle_max").set(f64::from(summary.max));

    gauge!("traffic_cycle_alerts").set(summary.alerts.len() as f64);
}

/// 记录空周期 (无数据，不产生输出)
pub fn record_empty_cycle() {
    counter!("traffic_cycles_total", "outcome" => "empty").increment(1);
}

/// 记录数据提交
pub fn record_reading_submitted(source_id: SourceId) {
    counter!(
        "traffic_readings_submitted_total",
        "source_id" => source_id.to_string()
    )
    .increment(1);
}

/// 记录拥堵告警
pub fn record_alert(alert: &CongestionAlert) {
    counter!(
        "traffic_congestion_alerts_total",
        "source_id" => alert.source_id.to_string()
    )
    .increment(1);
}

/// 记录持久化失败
pub fn record_persistence_failure(sink_name: &str) {
    counter!(
        "traffic_persistence_failures_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
}

/// 周期指标聚合器
///
/// 在内存中聚合指标，便于在运行结束时输出摘要。
#[derive(Debug, Clone, Default)]
pub struct CycleMetricsAggregator {
    /// 总周期数 (含空周期)
    pub total_cycles: u64,

    /// 空周期数
    pub empty_cycles: u64,

    /// 聚合的数据总数
    pub total_readings: u64,

    /// 告警总数
    pub total_alerts: u64,

    /// 周期平均值统计
    pub average_stats: RunningStats,

    /// 每周期数据量统计
    pub batch_size_stats: RunningStats,

    /// 各数据源告警次数
    pub alert_counts: HashMap<SourceId, u64>,
}

impl CycleMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, summary: &Summary) {
        self.total_cycles += 1;
        self.total_readings += summary.count as u64;
        self.total_alerts += summary.alerts.len() as u64;

        self.average_stats.push(f64::from(summary.average));
        self.batch_size_stats.push(summary.count as f64);

        for alert in &summary.alerts {
            *self.alert_counts.entry(alert.source_id).or_insert(0) += 1;
        }
    }

    /// 记录空周期
    pub fn update_empty(&mut self) {
        self.total_cycles += 1;
        self.empty_cycles += 1;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        let mut alert_counts: Vec<(SourceId, u64)> =
            self.alert_counts.iter().map(|(k, v)| (*k, *v)).collect();
        alert_counts.sort_unstable();

        MetricsSummary {
            total_cycles: self.total_cycles,
            empty_cycles: self.empty_cycles,
            total_readings: self.total_readings,
            total_alerts: self.total_alerts,
            alert_rate: if self.total_readings > 0 {
                self.total_alerts as f64 / self.total_readings as f64 * 100.0
            } else {
                0.0
            },
            cycle_average: StatsSummary::from(&self.average_stats),
            batch_size: StatsSummary::from(&self.batch_size_stats),
            source_alert_counts: alert_counts,
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_cycles: u64,
    pub empty_cycles: u64,
    pub total_readings: u64,
    pub total_alerts: u64,
    pub alert_rate: f64,
    pub cycle_average: StatsSummary,
    pub batch_size: StatsSummary,
    pub source_alert_counts: Vec<(SourceId, u64)>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Aggregation Metrics Summary ===")?;
        writeln!(
            f,
            "Cycles: {} ({} empty)",
            self.total_cycles, self.empty_cycles
        )?;
        writeln!(f, "Readings aggregated: {}", self.total_readings)?;
        writeln!(
            f,
            "Congestion alerts: {} ({:.2}%)",
            self.total_alerts, self.alert_rate
        )?;
        writeln!(f, "Cycle average: {}", self.cycle_average)?;
        writeln!(f, "Batch size: {}", self.batch_size)?;

        if !self.source_alert_counts.is_empty() {
            writeln!(f, "Alerts per source:")?;
            for (source, count) in &self.source_alert_counts {
                writeln!(f, "  {}: {}", source, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.2}, max={:.2}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}
