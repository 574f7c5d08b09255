//! Runtime bean.

use super::{counter, RUNTIME_MBEAN};
use crate::JolokiaClient;
use vitals_core::Result;

/// `java.lang:type=Runtime`
pub struct RuntimeApi<'a> {
    client: &'a JolokiaClient,
}

impl<'a> RuntimeApi<'a> {
    pub(crate) fn new(client: &'a JolokiaClient) -> Self {
        Self { client }
    }

    /// JVM uptime in milliseconds
    pub async fn uptime(&self) -> Result<u64> {
        let value = self.client.read(RUNTIME_MBEAN, "Uptime").await?;
        counter("Uptime", &value)
    }
}
