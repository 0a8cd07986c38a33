//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 端到端管道测试 (sources -> sink -> worker -> persistence)
//! - 并发性质测试 (无丢失、无重复、有界关闭)

#[cfg(test)]
mod contract_tests {
    use contracts::{ConfigVersion, PipelineConfig, Summary};

    #[test]
    fn test_default_config_is_v1_and_serializes_version() {
        let config = PipelineConfig::default();
        assert_eq!(config.version, ConfigVersion::V1);

        let toml = config_loader::ConfigLoader::to_toml(&config).unwrap();
        assert!(toml.contains("version = \"V1\""), "{toml}");
    }

    #[test]
    fn test_default_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.sources.count, 5);
        assert_eq!(config.sources.update_interval_ms, 1500);
        assert_eq!(config.aggregation.interval_ms, 3000);
        assert_eq!(config.aggregation.congestion_threshold, 80);
        assert_eq!(config.run.duration_secs, 60);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config.toml");
        let config = config_loader::ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_persistence_line_format() {
        let summary = Summary {
            cycle: 1,
            count: 3,
            total: 210,
            average: 70,
            min: 50,
            max: 90,
            alerts: vec![],
        };
        assert_eq!(summary.to_string(), "Avg: 70, Min: 50, Max: 90");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use aggregation::{AggregationSink, AggregationWorker};
    use contracts::{ShutdownSignal, SourceId};
    use sinks::{FileSummarySink, MemoryAlertSink, MemorySummarySink};
    use sources::{ScriptedGenerator, SourcePool};

    /// End-to-end test: scripted sources -> AggregationSink -> worker -> memory sinks
    ///
    /// 验证完整的数据流：
    /// 1. 每个数据源以固定值提交数据
    /// 2. Worker 按周期汇总
    /// 3. 告警数量等于超过阈值的读数数量
    #[test]
    fn test_e2e_scripted_pipeline() {
        let shutdown = ShutdownSignal::new();
        let sink = AggregationSink::new(&shutdown);
        let summaries = MemorySummarySink::new();
        let alerts = MemoryAlertSink::new();

        let worker = AggregationWorker::new(
            Arc::clone(&sink),
            summaries.clone(),
            alerts.clone(),
            Duration::from_millis(50),
            80,
            shutdown.clone(),
        )
        .spawn()
        .unwrap();

        let scripts = [50, 90, 70];
        let pool = SourcePool::spawn_with(
            3,
            Duration::from_millis(10),
            Arc::clone(&sink),
            &shutdown,
            |id: SourceId| ScriptedGenerator::new([scripts[id.get() as usize]]),
        )
        .unwrap();

        std::thread::sleep(Duration::from_millis(300));
        shutdown.trigger();

        let reports = pool.join().unwrap();
        let report = worker.join().unwrap();
        // anything submitted after the final drain stays in the sink
        let leftover = sink.drain();

        let submitted: u64 = reports.iter().map(|r| r.submitted).sum();
        assert_eq!(report.readings_aggregated + leftover.len() as u64, submitted);

        let high = reports
            .iter()
            .find(|r| r.source_id == SourceId::new(1))
            .unwrap()
            .submitted;
        let high_leftover = leftover.iter().filter(|r| r.value == 90).count() as u64;
        assert_eq!(report.alerts_raised, high - high_leftover);
        assert!(alerts.alerts().iter().all(|a| a.source_id == SourceId::new(1) && a.value == 90));

        let written = summaries.summaries();
        assert_eq!(written.len() as u64, report.summaries_written);
        for summary in written {
            assert!(summary.min >= 50 && summary.max <= 90);
            assert!(summary.min <= summary.average && summary.average <= summary.max);
            assert_eq!(summary.average as u64, summary.total / summary.count as u64);
        }
    }

    /// 单周期 {50, 90, 70} 写入文件
    #[test]
    fn test_e2e_single_cycle_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traffic_log.txt");

        let shutdown = ShutdownSignal::new();
        let sink = AggregationSink::new(&shutdown);
        let alerts = MemoryAlertSink::new();
        let worker = AggregationWorker::new(
            Arc::clone(&sink),
            FileSummarySink::create(&path).unwrap(),
            alerts.clone(),
            Duration::from_secs(30),
            80,
            shutdown.clone(),
        )
        .spawn()
        .unwrap();

        for (id, value) in [(0, 50), (1, 90), (2, 70)] {
            sink.submit(contracts::Reading::now(SourceId::new(id), value));
        }

        let started = Instant::now();
        shutdown.trigger();
        let report = worker.join().unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));

        assert_eq!(report.summaries_written, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Avg: 70, Min: 50, Max: 90\n"
        );
        let delivered = alerts.alerts();
        assert_eq!(delivered.len(), 1);
        assert_eq!(
            delivered[0].to_string(),
            "Sensor 1: Congestion detected with density 90"
        );
    }

    /// 配置文件驱动的管道
    #[test]
    fn test_e2e_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("summary.txt");
        let config_path = dir.path().join("aggregator.toml");
        std::fs::write(
            &config_path,
            format!(
                "[sources]\ncount = 4\nupdate_interval_ms = 5\nseed = 11\n\n\
                 [aggregation]\ninterval_ms = 25\n\n\
                 [output]\nlog_path = {:?}\nalerts = \"log\"\n",
                log_path.display().to_string()
            ),
        )
        .unwrap();

        let config = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        assert!(config_loader::collect_warnings(&config).is_empty());

        let shutdown = ShutdownSignal::new();
        let sink = AggregationSink::new(&shutdown);
        let worker = AggregationWorker::new(
            Arc::clone(&sink),
            FileSummarySink::create(&config.output.log_path).unwrap(),
            sinks::build_alert_sink(config.output.alerts),
            config.aggregation.interval(),
            config.aggregation.congestion_threshold,
            shutdown.clone(),
        )
        .spawn()
        .unwrap();
        let pool = SourcePool::spawn(&config.sources, Arc::clone(&sink), &shutdown).unwrap();
        assert_eq!(pool.len(), 4);

        std::thread::sleep(Duration::from_millis(150));
        shutdown.trigger();
        pool.join().unwrap();
        let report = worker.join().unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count() as u64, report.summaries_written);
        assert!(report.summaries_written >= 1);
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use aggregation::AggregationSink;
    use contracts::{Reading, ShutdownSignal, SourceId};
    use sources::{SourcePool, UniformGenerator};

    /// K 个提交线程 + 1 个消费线程：消费总数 == 提交总数
    #[test]
    fn test_k_producers_one_drainer_conserves_readings() {
        const PRODUCERS: u32 = 8;
        const PER_PRODUCER: u32 = 2_000;

        let shutdown = ShutdownSignal::new();
        let sink = AggregationSink::new(&shutdown);

        let drainer = {
            let sink = Arc::clone(&sink);
            let shutdown = shutdown.clone();
            thread::spawn(move || {
                let mut seen = Vec::new();
                while !shutdown.is_triggered() {
                    seen.extend(sink.drain_or_wait(Duration::from_millis(1)));
                }
                seen.extend(sink.drain());
                seen
            })
        };

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|id| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for value in 0..PER_PRODUCER {
                        sink.submit(Reading::now(SourceId::new(id), value));
                    }
                })
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }
        shutdown.trigger();
        let seen = drainer.join().unwrap();

        assert_eq!(seen.len(), (PRODUCERS * PER_PRODUCER) as usize);
        assert_eq!(sink.pending(), 0);

        let mut keys: Vec<(u32, u32)> = seen.iter().map(|r| (r.source_id.get(), r.value)).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), (PRODUCERS * PER_PRODUCER) as usize);
    }

    /// 关闭后，所有数据源在一个更新周期内退出 (留少量调度余量)
    #[test]
    fn test_shutdown_join_is_bounded() {
        let shutdown = ShutdownSignal::new();
        let sink = AggregationSink::new(&shutdown);
        let interval = Duration::from_millis(50);

        let pool = SourcePool::spawn_with(16, interval, Arc::clone(&sink), &shutdown, |id| {
            UniformGenerator::for_source(id, Some(3))
        })
        .unwrap();

        thread::sleep(Duration::from_millis(120));
        let started = Instant::now();
        shutdown.trigger();
        let reports = pool.join().unwrap();

        assert_eq!(reports.len(), 16);
        let bound = interval * 2 + Duration::from_millis(100);
        assert!(started.elapsed() < bound, "join took {:?}", started.elapsed());
        assert!(sink
            .drain()
            .iter()
            .all(|r| (contracts::READING_MIN..=contracts::READING_MAX).contains(&r.value)));
    }

    /// 每个数据源内时间戳单调不减
    #[test]
    fn test_timestamps_non_decreasing_per_source() {
        let shutdown = ShutdownSignal::new();
        let sink = AggregationSink::new(&shutdown);
        let pool = SourcePool::spawn_with(4, Duration::from_millis(2), Arc::clone(&sink), &shutdown, |id| {
            UniformGenerator::for_source(id, None)
        })
        .unwrap();

        thread::sleep(Duration::from_millis(60));
        shutdown.trigger();
        pool.join().unwrap();

        let batch = sink.drain();
        for id in 0..4 {
            let stamps: Vec<_> = batch
                .iter()
                .filter(|r| r.source_id == SourceId::new(id))
                .map(|r| r.timestamp)
                .collect();
            assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
