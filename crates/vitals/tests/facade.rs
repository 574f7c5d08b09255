//! The facade exposes a working sampling pipeline.

use vitals::sampler::{CpuSampler, Sampler};
use vitals::source::fake::ScriptedSource;
use vitals::{RawCounterSample, TickReport};

#[test]
fn cpu_pipeline_through_facade() {
    tokio_test::block_on(async {
        let source = ScriptedSource::new();
        let mut cpu = CpuSampler::new(&source).await;

        assert_eq!(cpu.tick(&source).await.unwrap().utilization().map(|u| u.percent()), Some(0.0));

        source.update(|s| s.advance(250_000_000, 1000));
        let report = cpu.tick(&source).await.unwrap();
        assert!(matches!(report, TickReport::Cpu(_)));
        assert_eq!(report.to_string(), "Cpu usage: 25.0%");
    });
}

#[test]
fn one_shot_counters() {
    tokio_test::block_on(async {
        let source = ScriptedSource::new();
        source.update(|s| {
            s.advance(7, 9);
            s.set_collector("young", 4);
            s.set_collector("old", 6);
        });

        let sample = RawCounterSample::collect(&source).await.unwrap();
        assert_eq!(sample.cpu_time_nanos, 7);
        assert_eq!(sample.uptime_millis, 9);
        assert_eq!(sample.gc_time_millis, 10);
        assert_eq!(sample.collectors.len(), 2);
    });
}
