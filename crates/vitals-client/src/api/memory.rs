//! Memory bean.

use super::{counter, unexpected, MEMORY_MBEAN};
use crate::JolokiaClient;
use serde_json::Value;
use vitals_core::{HeapUsage, Result};

/// `java.lang:type=Memory`
pub struct MemoryApi<'a> {
    client: &'a JolokiaClient,
}

impl<'a> MemoryApi<'a> {
    pub(crate) fn new(client: &'a JolokiaClient) -> Self {
        Self { client }
    }

    /// Current heap figures. An undefined maximum (`-1`) is reported as 0.
    pub async fn heap_memory_usage(&self) -> Result<HeapUsage> {
        let value = self.client.read(MEMORY_MBEAN, "HeapMemoryUsage").await?;
        parse_heap(&value)
    }
}

fn parse_heap(value: &Value) -> Result<HeapUsage> {
    let field = |name: &str| {
        value
            .get(name)
            .ok_or_else(|| unexpected("HeapMemoryUsage", value))
    };

    let max = field("max")?;
    let max_bytes = match max.as_i64() {
        Some(n) if n < 0 => 0,
        _ => counter("HeapMemoryUsage.max", max)?,
    };

    Ok(HeapUsage {
        used_bytes: counter("HeapMemoryUsage.used", field("used")?)?,
        committed_bytes: counter("HeapMemoryUsage.committed", field("committed")?)?,
        max_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_heap() {
        let heap = parse_heap(&json!({
            "init": 262_144_000,
            "used": 1024,
            "committed": 2_048_000,
            "max": 4096
        }))
        .unwrap();
        assert_eq!(heap.used_bytes, 1024);
        assert_eq!(heap.committed_bytes, 2_048_000);
        assert_eq!(heap.max_bytes, 4096);
    }

    #[test]
    fn test_undefined_max_is_zero() {
        let heap = parse_heap(&json!({"used": 1, "committed": 2, "max": -1})).unwrap();
        assert_eq!(heap.max_bytes, 0);
    }

    #[test]
    fn test_missing_field() {
        assert!(parse_heap(&json!({"used": 1, "max": 3})).is_err());
    }
}
