//! Core types and algorithms for vitals.
//!
//! This crate turns cumulative resource counters into per-interval
//! utilization:
//!
//! - **Rate normalization** ([`rate`]): counter and uptime deltas to a bounded percentage
//! - **Samplers** ([`sampler`]): CPU and GC utilization, heap snapshots
//! - **Collaborators**: the [`MetricsSource`] the samplers read and the [`Reporter`] they feed
//! - **Errors**: [`VitalsError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use vitals_core::sampler::{CpuSampler, Sampler};
//!
//! let mut cpu = CpuSampler::new(&source).await;
//! let first = cpu.tick(&source).await?;   // always 0.0%
//! let second = cpu.tick(&source).await?;  // utilization since the first tick
//! println!("{second}");
//! ```

#![doc(html_root_url = "https://docs.rs/vitals-core/0.3.0")]

mod error;
pub mod format;
pub mod rate;
pub mod reporter;
pub mod sampler;
pub mod source;
pub mod types;

pub use error::{Result, VitalsError};
pub use reporter::{MemoryReporter, Reporter};
pub use source::MetricsSource;
pub use types::*;
