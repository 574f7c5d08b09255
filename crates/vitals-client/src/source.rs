//! [`MetricsSource`] backed by a Jolokia agent.

use crate::JolokiaClient;
use async_trait::async_trait;
use vitals_core::{CollectorHandle, HeapUsage, MetricsSource, Result};

#[async_trait]
impl MetricsSource for JolokiaClient {
    async fn process_cpu_time_nanos(&self) -> Result<u64> {
        self.operating_system().process_cpu_time().await
    }

    async fn processing_capacity(&self) -> Result<Option<u64>> {
        self.operating_system().processing_capacity().await
    }

    async fn uptime_millis(&self) -> Result<u64> {
        self.runtime().uptime().await
    }

    async fn available_processors(&self) -> Result<u32> {
        self.operating_system().available_processors().await
    }

    async fn garbage_collectors(&self) -> Result<Vec<CollectorHandle>> {
        self.gc().list().await
    }

    async fn collection_time_millis(&self, collector: &CollectorHandle) -> Result<u64> {
        self.gc().collection_time(collector).await
    }

    async fn heap_usage(&self) -> Result<HeapUsage> {
        self.memory().heap_memory_usage().await
    }
}
