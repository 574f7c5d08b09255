//! Stateful CPU/GC samplers, the stateless memory sampler and the
//! machine-wide CPU sampler.

mod cpu;
mod gc;
mod memory;
mod system;

pub use cpu::CpuSampler;
pub use gc::GcSampler;
pub use memory::MemorySampler;
pub use system::SystemCpuSampler;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, VitalsError};
use crate::rate::{normalize, CounterUnit};
use crate::source::MetricsSource;
use crate::types::{CollectorHandle, CounterReading, SamplerKind, TickReport, Utilization};

/// One sampling pipeline, driven once per tick.
///
/// A failed tick must leave the sampler exactly as it was before the call.
#[async_trait]
pub trait Sampler: Send {
    /// Which pipeline this is
    fn kind(&self) -> SamplerKind;

    /// Fetch counters from `source` and produce this interval's report
    async fn tick(&mut self, source: &dyn MetricsSource) -> Result<TickReport>;
}

/// Build the sampler for `kind`.
///
/// Only the CPU sampler talks to the source at construction time, and it
/// never fails doing so.
pub async fn sampler_for(kind: SamplerKind, source: &dyn MetricsSource) -> Box<dyn Sampler> {
    match kind {
        SamplerKind::Cpu => Box::new(CpuSampler::new(source).await),
        SamplerKind::Gc => Box::new(GcSampler::new()),
        SamplerKind::Memory => Box::new(MemorySampler::new()),
        SamplerKind::System => Box::new(SystemCpuSampler::new()),
    }
}

/// Previous observation of a stateful sampler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerState {
    previous: Option<CounterReading>,
}

impl SamplerState {
    /// State before the first tick
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Last successfully observed reading
    #[must_use]
    pub const fn previous(&self) -> Option<CounterReading> {
        self.previous
    }

    /// Record `current` and return the utilization since the previous reading.
    ///
    /// The first reading only primes the state and yields 0.0.
    pub fn advance(
        &mut self,
        current: CounterReading,
        unit: CounterUnit,
        processor_count: u32,
    ) -> Utilization {
        let usage = self.previous.map_or(Utilization::ZERO, |previous| {
            normalize(previous, current, unit, processor_count)
        });
        self.previous = Some(current);
        usage
    }
}

/// Enumerate the active collectors and sum their collection times.
///
/// Collectors that disappear between enumeration and read are skipped.
pub(crate) async fn sum_collection_time(
    source: &dyn MetricsSource,
) -> Result<(Vec<CollectorHandle>, u64)> {
    let listed = source.garbage_collectors().await?;
    let mut present = Vec::with_capacity(listed.len());
    let mut total: u64 = 0;

    for collector in listed {
        match source.collection_time_millis(&collector).await {
            Ok(millis) => {
                total = total.saturating_add(millis);
                present.push(collector);
            }
            Err(VitalsError::CollectorNotFound { name }) => {
                debug!(collector = %name, "collector vanished before it was read");
            }
            Err(e) => return Err(e),
        }
    }

    Ok((present, total))
}
