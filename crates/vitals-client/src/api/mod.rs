//! Typed access to the `java.lang` platform beans.

mod gc;
mod memory;
mod os;
mod runtime;

pub use gc::GarbageCollectorApi;
pub use memory::MemoryApi;
pub use os::OperatingSystemApi;
pub use runtime::RuntimeApi;

use serde_json::Value;
use vitals_core::{Result, VitalsError};

/// Operating system bean
pub const OPERATING_SYSTEM_MBEAN: &str = "java.lang:type=OperatingSystem";

/// Runtime bean
pub const RUNTIME_MBEAN: &str = "java.lang:type=Runtime";

/// Memory bean
pub const MEMORY_MBEAN: &str = "java.lang:type=Memory";

/// Pattern matching every garbage collector bean
pub const GARBAGE_COLLECTOR_PATTERN: &str = "java.lang:type=GarbageCollector,*";

/// Interpret a JSON value as a non-negative counter
pub(crate) fn counter(what: &str, value: &Value) -> Result<u64> {
    value.as_u64().ok_or_else(|| unexpected(what, value))
}

pub(crate) fn unexpected(what: &str, value: &Value) -> VitalsError {
    VitalsError::UnexpectedValue {
        what: what.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counter_parsing() {
        assert_eq!(counter("Uptime", &json!(1234)).unwrap(), 1234);
        assert!(counter("Uptime", &json!(-1)).is_err());
        assert!(counter("Uptime", &json!("12")).is_err());
        assert!(counter("Uptime", &Value::Null).is_err());
    }
}
