use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use super::{Sampler, SamplerState};
use crate::error::Result;
use crate::rate::CounterUnit;
use crate::source::MetricsSource;
use crate::types::{CounterReading, SamplerKind, TickReport, UtilizationTick};

/// Process CPU utilization, normalized across processors
#[derive(Debug, Clone)]
pub struct CpuSampler {
    clock_multiplier: u64,
    state: SamplerState,
}

impl CpuSampler {
    /// Create a sampler, querying the processing capacity once.
    ///
    /// A missing capacity counter, a zero capacity, or a failed read all fall
    /// back to a multiplier of 1.
    pub async fn new(source: &dyn MetricsSource) -> Self {
        let clock_multiplier = match source.processing_capacity().await {
            Ok(Some(capacity)) if capacity > 0 => capacity,
            Ok(Some(_)) => {
                debug!("processing capacity reported as 0, using multiplier 1");
                1
            }
            Ok(None) => 1,
            Err(e) if e.is_missing_capability() => 1,
            Err(e) => {
                warn!(error = %e, "could not read processing capacity, using multiplier 1");
                1
            }
        };
        Self::with_multiplier(clock_multiplier)
    }

    /// Create a sampler with a known clock multiplier
    #[must_use]
    pub const fn with_multiplier(clock_multiplier: u64) -> Self {
        Self {
            clock_multiplier,
            state: SamplerState::new(),
        }
    }

    /// Multiplier applied to the raw CPU time
    #[must_use]
    pub const fn clock_multiplier(&self) -> u64 {
        self.clock_multiplier
    }

    /// State after the last successful tick
    #[must_use]
    pub const fn state(&self) -> &SamplerState {
        &self.state
    }
}

#[async_trait]
impl Sampler for CpuSampler {
    fn kind(&self) -> SamplerKind {
        SamplerKind::Cpu
    }

    async fn tick(&mut self, source: &dyn MetricsSource) -> Result<TickReport> {
        let cpu_time = source
            .process_cpu_time_nanos()
            .await?
            .saturating_mul(self.clock_multiplier);
        let uptime_millis = source.uptime_millis().await?;
        let processors = source.available_processors().await?;

        let utilization = self.state.advance(
            CounterReading::new(cpu_time, uptime_millis),
            CounterUnit::Nanos,
            processors,
        );

        Ok(TickReport::Cpu(UtilizationTick {
            timestamp: Utc::now(),
            utilization,
        }))
    }
}
