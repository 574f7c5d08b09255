//! CPU, GC and heap utilization sampling for JVMs and local processes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitals::{JolokiaClient, MemoryReporter, SamplerKind, Scheduler, SchedulerConfig};
//!
//! #[tokio::main]
//! async fn main() -> vitals::Result<()> {
//!     let source = Arc::new(JolokiaClient::new("http://localhost:8778/jolokia")?);
//!     let reporter = Arc::new(MemoryReporter::new());
//!
//!     let scheduler =
//!         Scheduler::for_kinds(SchedulerConfig::default(), &SamplerKind::ALL, source.as_ref()).await;
//!     let handle = scheduler.start(source, reporter.clone())?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
//!     for summary in handle.shutdown().await {
//!         println!("{summary}");
//!     }
//!     for report in reporter.reports() {
//!         println!("{report}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - rustls and the scheduler
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS
//! - `scheduler` - Fixed-rate scheduling of samplers on tokio

#![doc(html_root_url = "https://docs.rs/vitals/0.3.0")]

// Re-export core types
pub use vitals_core::*;

// Re-export sources
pub use vitals_client::{
    Credentials, JolokiaClient, JolokiaClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
#[cfg(target_os = "linux")]
pub use vitals_client::ProcfsSource;

// Re-export scheduler if enabled
#[cfg(feature = "scheduler")]
pub use vitals_scheduler::{Scheduler, SchedulerConfig, SchedulerHandle, TaskSummary};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
