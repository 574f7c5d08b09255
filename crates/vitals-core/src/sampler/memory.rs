use async_trait::async_trait;
use chrono::Utc;

use super::Sampler;
use crate::error::Result;
use crate::source::MetricsSource;
use crate::types::{MemoryTick, SamplerKind, TickReport};

/// Heap snapshot, no history
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySampler;

impl MemorySampler {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Sampler for MemorySampler {
    fn kind(&self) -> SamplerKind {
        SamplerKind::Memory
    }

    async fn tick(&mut self, source: &dyn MetricsSource) -> Result<TickReport> {
        let heap = source.heap_usage().await?;
        Ok(TickReport::Memory(MemoryTick::new(Utc::now(), heap)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::{Counter, ScriptedSource};
    use crate::types::HeapUsage;

    #[tokio::test]
    async fn test_reports_heap() {
        let source = ScriptedSource::new();
        source.update(|s| {
            s.heap = HeapUsage {
                used_bytes: 10,
                committed_bytes: 20,
                max_bytes: 30,
            };
        });

        let report = MemorySampler::new().tick(&source).await.unwrap();
        match report {
            TickReport::Memory(m) => {
                assert_eq!(m.used_bytes, 10);
                assert_eq!(m.committed_bytes, 20);
                assert_eq!(m.max_bytes, 30);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_is_returned() {
        let source = ScriptedSource::new();
        source.update(|s| s.fail(Counter::Heap));
        assert!(MemorySampler::new().tick(&source).await.is_err());
    }
}
