//! Operating system bean.

use super::{counter, OPERATING_SYSTEM_MBEAN};
use crate::JolokiaClient;
use tracing::debug;
use vitals_core::Result;

/// `java.lang:type=OperatingSystem`
pub struct OperatingSystemApi<'a> {
    client: &'a JolokiaClient,
}

impl<'a> OperatingSystemApi<'a> {
    pub(crate) fn new(client: &'a JolokiaClient) -> Self {
        Self { client }
    }

    /// Cumulative CPU time of the JVM process in nanoseconds
    pub async fn process_cpu_time(&self) -> Result<u64> {
        let value = self
            .client
            .read(OPERATING_SYSTEM_MBEAN, "ProcessCpuTime")
            .await?;
        counter("ProcessCpuTime", &value)
    }

    /// Processor clock multiplier, only exposed by some vendor JVMs.
    ///
    /// Returns `None` when the attribute does not exist.
    pub async fn processing_capacity(&self) -> Result<Option<u64>> {
        match self
            .client
            .read(OPERATING_SYSTEM_MBEAN, "ProcessingCapacity")
            .await
        {
            Ok(value) => counter("ProcessingCapacity", &value).map(Some),
            Err(e) if e.is_missing_capability() => {
                debug!("agent has no ProcessingCapacity attribute");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Number of processors available to the JVM
    pub async fn available_processors(&self) -> Result<u32> {
        let value = self
            .client
            .read(OPERATING_SYSTEM_MBEAN, "AvailableProcessors")
            .await?;
        let count = counter("AvailableProcessors", &value)?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
