use async_trait::async_trait;
use chrono::Utc;

use super::{sum_collection_time, Sampler, SamplerState};
use crate::error::Result;
use crate::rate::CounterUnit;
use crate::source::MetricsSource;
use crate::types::{CounterReading, SamplerKind, TickReport, UtilizationTick};

/// Share of processor capacity spent in garbage-collection pauses.
///
/// The collector set is enumerated on every tick since runtimes add and
/// remove collectors over their lifetime.
#[derive(Debug, Clone, Default)]
pub struct GcSampler {
    state: SamplerState,
}

impl GcSampler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SamplerState::new(),
        }
    }

    /// State after the last successful tick
    #[must_use]
    pub const fn state(&self) -> &SamplerState {
        &self.state
    }
}

#[async_trait]
impl Sampler for GcSampler {
    fn kind(&self) -> SamplerKind {
        SamplerKind::Gc
    }

    async fn tick(&mut self, source: &dyn MetricsSource) -> Result<TickReport> {
        let (_, gc_time_millis) = sum_collection_time(source).await?;
        let uptime_millis = source.uptime_millis().await?;
        let processors = source.available_processors().await?;

        let utilization = self.state.advance(
            CounterReading::new(gc_time_millis, uptime_millis),
            CounterUnit::Millis,
            processors,
        );

        Ok(TickReport::Gc(UtilizationTick {
            timestamp: Utc::now(),
            utilization,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::{Counter, ScriptedSource};
    use crate::types::CounterReading;

    async fn percent(sampler: &mut GcSampler, source: &ScriptedSource) -> f64 {
        sampler
            .tick(source)
            .await
            .unwrap()
            .utilization()
            .unwrap()
            .percent()
    }

    #[tokio::test]
    async fn test_sums_all_collectors() {
        let source = ScriptedSource::new();
        source.update(|s| {
            s.uptime_millis = 10_000;
            s.set_collector("young", 1_000);
            s.set_collector("old", 2_000);
        });
        let mut sampler = GcSampler::new();
        assert_eq!(percent(&mut sampler, &source).await, 0.0);

        // 100 ms + 50 ms of pauses over 1 s on one processor
        source.update(|s| {
            s.uptime_millis += 1000;
            s.set_collector("young", 1_100);
            s.set_collector("old", 2_050);
        });
        assert_eq!(percent(&mut sampler, &source).await, 15.0);
        assert_eq!(sampler.state().previous(), Some(CounterReading::new(3_150, 11_000)));
    }

    #[tokio::test]
    async fn test_collectors_enumerated_every_tick() {
        let source = ScriptedSource::new();
        let mut sampler = GcSampler::new();
        for _ in 0..3 {
            source.update(|s| s.uptime_millis += 1000);
            sampler.tick(&source).await.unwrap();
        }
        assert_eq!(source.calls(Counter::Collectors), 3);
    }

    #[tokio::test]
    async fn test_collector_removed_between_ticks() {
        let source = ScriptedSource::new();
        source.update(|s| {
            s.processor_count = 2;
            s.uptime_millis = 1000;
            s.set_collector("young", 400);
            s.set_collector("old", 600);
        });
        let mut sampler = GcSampler::new();
        percent(&mut sampler, &source).await;

        // the old-generation collector is gone; the sum drops below the previous one
        source.update(|s| {
            s.uptime_millis = 2000;
            s.remove_collector("old");
            s.set_collector("young", 500);
        });
        assert_eq!(percent(&mut sampler, &source).await, 0.0);

        // from now on only the young collector counts
        source.update(|s| {
            s.uptime_millis = 3000;
            s.set_collector("young", 900);
        });
        assert_eq!(percent(&mut sampler, &source).await, 20.0);
    }

    #[tokio::test]
    async fn test_collector_vanishing_mid_tick() {
        let source = ScriptedSource::new();
        source.update(|s| {
            s.uptime_millis = 1000;
            s.set_collector("young", 100);
            s.vanished.insert("concurrent".into());
        });
        let mut sampler = GcSampler::new();
        assert!(sampler.tick(&source).await.is_ok());
        assert_eq!(sampler.state().previous(), Some(CounterReading::new(100, 1000)));
    }

    #[tokio::test]
    async fn test_no_collectors() {
        let source = ScriptedSource::new();
        let mut sampler = GcSampler::new();
        percent(&mut sampler, &source).await;
        source.update(|s| s.uptime_millis += 1000);
        assert_eq!(percent(&mut sampler, &source).await, 0.0);
    }

    #[tokio::test]
    async fn test_failed_tick_keeps_state() {
        let source = ScriptedSource::new();
        source.update(|s| {
            s.uptime_millis = 1000;
            s.set_collector("young", 100);
        });
        let mut sampler = GcSampler::new();
        sampler.tick(&source).await.unwrap();

        source.update(|s| {
            s.uptime_millis = 2000;
            s.set_collector("young", 900);
            s.fail(Counter::Processors);
        });
        assert!(sampler.tick(&source).await.is_err());
        assert_eq!(sampler.state().previous(), Some(CounterReading::new(100, 1000)));

        // the next tick spans both intervals: 200 ms over 2 s
        source.update(|s| {
            s.recover(Counter::Processors);
            s.uptime_millis = 3000;
            s.set_collector("young", 300);
        });
        assert_eq!(percent(&mut sampler, &source).await, 10.0);
    }
}
