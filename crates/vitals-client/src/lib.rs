//! Metrics sources for vitals.
//!
//! - [`JolokiaClient`]: a remote JVM through its Jolokia HTTP agent
//! - [`ProcfsSource`]: a local process through `/proc` (Linux only)

#![doc(html_root_url = "https://docs.rs/vitals-client/0.3.0")]

mod client;
mod config;
mod source;
pub mod api;
#[cfg(target_os = "linux")]
mod local;

pub use client::{JolokiaClient, JolokiaClientBuilder};
pub use config::*;
#[cfg(target_os = "linux")]
pub use local::ProcfsSource;
pub use vitals_core::{MetricsSource, Result, VitalsError};
