//! Garbage collector beans.

use super::{counter, GARBAGE_COLLECTOR_PATTERN};
use crate::JolokiaClient;
use vitals_core::{CollectorHandle, Result, VitalsError};

/// `java.lang:type=GarbageCollector,name=*`
pub struct GarbageCollectorApi<'a> {
    client: &'a JolokiaClient,
}

impl<'a> GarbageCollectorApi<'a> {
    pub(crate) fn new(client: &'a JolokiaClient) -> Self {
        Self { client }
    }

    /// Collectors currently registered in the JVM
    pub async fn list(&self) -> Result<Vec<CollectorHandle>> {
        let mut names = self.client.search(GARBAGE_COLLECTOR_PATTERN).await?;
        names.sort();
        Ok(names.into_iter().map(CollectorHandle::new).collect())
    }

    /// Cumulative collection time of one collector in milliseconds
    pub async fn collection_time(&self, collector: &CollectorHandle) -> Result<u64> {
        match self.client.read(collector.id(), "CollectionTime").await {
            Ok(value) => counter("CollectionTime", &value),
            Err(VitalsError::Remote {
                error_type: Some(ref t),
                ..
            }) if t.contains("InstanceNotFoundException") => Err(VitalsError::CollectorNotFound {
                name: collector.id().to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}
