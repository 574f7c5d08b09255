use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HeapUsage, SamplerKind, Utilization};
use crate::format::{format_bytes, format_percent};

/// Utilization emitted by the CPU, GC or system sampler for one interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilizationTick {
    /// When the tick completed
    pub timestamp: DateTime<Utc>,
    /// Normalized utilization for the interval
    #[serde(rename = "utilization_percent")]
    pub utilization: Utilization,
}

/// Heap snapshot emitted by the memory sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTick {
    /// When the tick completed
    pub timestamp: DateTime<Utc>,
    /// Bytes in use
    pub used_bytes: u64,
    /// Bytes committed
    pub committed_bytes: u64,
    /// Maximum bytes, 0 when undefined
    pub max_bytes: u64,
}

impl MemoryTick {
    /// Snapshot `heap` at `timestamp`
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, heap: HeapUsage) -> Self {
        Self {
            timestamp,
            used_bytes: heap.used_bytes,
            committed_bytes: heap.committed_bytes,
            max_bytes: heap.max_bytes,
        }
    }
}

/// Output of one completed tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TickReport {
    /// CPU utilization
    Cpu(UtilizationTick),
    /// GC utilization
    Gc(UtilizationTick),
    /// Heap snapshot
    Memory(MemoryTick),
    /// Machine-wide CPU utilization
    System(UtilizationTick),
}

impl TickReport {
    /// Which sampler produced the report
    #[must_use]
    pub const fn kind(&self) -> SamplerKind {
        match self {
            Self::Cpu(_) => SamplerKind::Cpu,
            Self::Gc(_) => SamplerKind::Gc,
            Self::Memory(_) => SamplerKind::Memory,
            Self::System(_) => SamplerKind::System,
        }
    }

    /// When the tick completed
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Cpu(t) | Self::Gc(t) | Self::System(t) => t.timestamp,
            Self::Memory(m) => m.timestamp,
        }
    }

    /// Utilization for CPU, GC and system reports
    #[must_use]
    pub const fn utilization(&self) -> Option<Utilization> {
        match self {
            Self::Cpu(t) | Self::Gc(t) | Self::System(t) => Some(t.utilization),
            Self::Memory(_) => None,
        }
    }
}

impl std::fmt::Display for TickReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu(t) => write!(f, "Cpu usage: {}", format_percent(t.utilization)),
            Self::Gc(t) => write!(f, "GC activity: {}", format_percent(t.utilization)),
            Self::System(t) => write!(f, "System cpu usage: {}", format_percent(t.utilization)),
            Self::Memory(m) => write!(
                f,
                "Memory usage: used={} B, size={} B, max={} B",
                format_bytes(m.used_bytes),
                format_bytes(m.committed_bytes),
                format_bytes(m.max_bytes)
            ),
        }
    }
}
