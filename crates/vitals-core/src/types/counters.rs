use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::MetricsSource;

/// One observation of a cumulative counter together with process uptime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterReading {
    /// Cumulative counter value in its native unit
    pub counter: u64,
    /// Process uptime in milliseconds at the time of the read
    pub uptime_millis: u64,
}

impl CounterReading {
    /// Create a reading
    #[must_use]
    pub const fn new(counter: u64, uptime_millis: u64) -> Self {
        Self {
            counter,
            uptime_millis,
        }
    }
}

/// Instantaneous heap figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapUsage {
    /// Bytes currently in use
    pub used_bytes: u64,
    /// Bytes committed by the runtime
    pub committed_bytes: u64,
    /// Upper bound in bytes, 0 when the runtime reports none
    pub max_bytes: u64,
}

/// Machine-wide processor time split into busy and idle jiffies,
/// summed over every processor since boot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTimes {
    /// Time spent running anything, steal included
    pub busy: u64,
    /// Time spent idle or waiting on I/O
    pub idle: u64,
}

impl CpuTimes {
    /// Create a reading
    #[must_use]
    pub const fn new(busy: u64, idle: u64) -> Self {
        Self { busy, idle }
    }

    /// Busy plus idle time
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.busy.saturating_add(self.idle)
    }
}

/// Opaque identifier of one garbage collector as enumerated by a source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectorHandle(String);

impl CollectorHandle {
    /// Wrap a source-specific identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Source-specific identifier (for Jolokia, the collector object name)
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }

    /// Human-readable name: the `name=` key of an object name, or the id itself
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.0
            .split_once(':')
            .map_or(self.0.as_str(), |(_, props)| props)
            .split(',')
            .find_map(|kv| kv.strip_prefix("name="))
            .unwrap_or(self.0.as_str())
    }
}

impl std::fmt::Display for CollectorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Every raw counter the source exposes, fetched once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCounterSample {
    /// Cumulative process CPU time in nanoseconds, before any clock multiplier
    pub cpu_time_nanos: u64,
    /// Cumulative GC pause time summed over the active collectors
    pub gc_time_millis: u64,
    /// Process uptime in milliseconds
    pub uptime_millis: u64,
    /// Logical processors available to the process
    pub processor_count: u32,
    /// Optional processing capacity multiplier
    pub processing_capacity: Option<u64>,
    /// Active collectors at the time of the read
    pub collectors: Vec<CollectorHandle>,
    /// Heap figures
    pub heap: HeapUsage,
}

impl RawCounterSample {
    /// Fetch every counter from `source`.
    ///
    /// A collector that vanishes between enumeration and read is left out
    /// of both `collectors` and the sum.
    pub async fn collect(source: &dyn MetricsSource) -> Result<Self> {
        let cpu_time_nanos = source.process_cpu_time_nanos().await?;
        let processing_capacity = source.processing_capacity().await?;
        let (collectors, gc_time_millis) = crate::sampler::sum_collection_time(source).await?;
        let uptime_millis = source.uptime_millis().await?;
        let processor_count = source.available_processors().await?;
        let heap = source.heap_usage().await?;

        Ok(Self {
            cpu_time_nanos,
            gc_time_millis,
            uptime_millis,
            processor_count,
            processing_capacity,
            collectors,
            heap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::ScriptedSource;

    #[test]
    fn test_collector_display_name() {
        let handle = CollectorHandle::new("java.lang:name=G1 Young Generation,type=GarbageCollector");
        assert_eq!(handle.display_name(), "G1 Young Generation");
        assert_eq!(handle.to_string(), "G1 Young Generation");

        let plain = CollectorHandle::new("scavenge");
        assert_eq!(plain.display_name(), "scavenge");
    }

    #[tokio::test]
    async fn test_collect_sums_collectors() {
        let source = ScriptedSource::new();
        source.update(|s| {
            s.cpu_time_nanos = 42;
            s.uptime_millis = 7;
            s.processor_count = 2;
            s.set_collector("young", 10);
            s.set_collector("old", 5);
        });

        let sample = RawCounterSample::collect(&source).await.unwrap();
        assert_eq!(sample.cpu_time_nanos, 42);
        assert_eq!(sample.gc_time_millis, 15);
        assert_eq!(sample.collectors.len(), 2);
        assert_eq!(sample.processor_count, 2);
        assert_eq!(sample.processing_capacity, None);
    }
}
