//! Fixed-rate scheduling of vitals samplers.
//!
//! Every registered sampler gets its own tokio task. Tasks share one start
//! instant and period, tick independently of each other and stop between
//! ticks when the scheduler is shut down.

#![doc(html_root_url = "https://docs.rs/vitals-scheduler/0.3.0")]

mod config;
mod scheduler;

pub use config::SchedulerConfig;
pub use scheduler::{Scheduler, SchedulerHandle, TaskSummary};
pub use vitals_core::{Result, VitalsError};
