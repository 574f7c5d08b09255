use async_trait::async_trait;
use chrono::Utc;

use super::Sampler;
use crate::error::{Result, VitalsError};
use crate::rate::busy_share;
use crate::source::MetricsSource;
use crate::types::{CpuTimes, SamplerKind, TickReport, Utilization, UtilizationTick};

/// Machine-wide CPU utilization, independent of any one process.
///
/// Needs a source that reports [`CpuTimes`]. Against any other source every
/// tick fails with [`VitalsError::Unsupported`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCpuSampler {
    previous: Option<CpuTimes>,
}

impl SystemCpuSampler {
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Reading taken by the last successful tick
    #[must_use]
    pub const fn previous(&self) -> Option<CpuTimes> {
        self.previous
    }
}

#[async_trait]
impl Sampler for SystemCpuSampler {
    fn kind(&self) -> SamplerKind {
        SamplerKind::System
    }

    async fn tick(&mut self, source: &dyn MetricsSource) -> Result<TickReport> {
        let current = source
            .machine_cpu_times()
            .await?
            .ok_or_else(|| VitalsError::Unsupported("machine CPU times".into()))?;

        let utilization = self
            .previous
            .map_or(Utilization::ZERO, |previous| busy_share(previous, current));
        self.previous = Some(current);

        Ok(TickReport::System(UtilizationTick {
            timestamp: Utc::now(),
            utilization,
        }))
    }
}
