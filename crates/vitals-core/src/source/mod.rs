//! The metrics source collaborator.

pub mod fake;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CollectorHandle, CpuTimes, HeapUsage};

/// Raw counters of a monitored process.
///
/// Implementations are shared read-only by every sampler and must tolerate
/// concurrent calls.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Cumulative CPU time consumed by the process, in nanoseconds
    async fn process_cpu_time_nanos(&self) -> Result<u64>;

    /// Processing capacity multiplier, `None` when the source has no such counter
    async fn processing_capacity(&self) -> Result<Option<u64>>;

    /// Process uptime in milliseconds
    async fn uptime_millis(&self) -> Result<u64>;

    /// Logical processors available to the process
    async fn available_processors(&self) -> Result<u32>;

    /// Currently active garbage collectors
    async fn garbage_collectors(&self) -> Result<Vec<CollectorHandle>>;

    /// Cumulative pause time of one collector, in milliseconds
    async fn collection_time_millis(&self, collector: &CollectorHandle) -> Result<u64>;

    /// Instantaneous heap figures
    async fn heap_usage(&self) -> Result<HeapUsage>;

    /// Machine-wide busy and idle processor time, `None` when the source
    /// only sees one process
    async fn machine_cpu_times(&self) -> Result<Option<CpuTimes>> {
        Ok(None)
    }
}
