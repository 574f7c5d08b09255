//! # vitals-cli
//!
//! Command-line front end for the vitals samplers.
//!
//! ## Features
//!
//! - **watch**: CPU, GC and heap utilization every period until Ctrl-C
//! - **counters**: one-shot dump of the raw counters
//! - **Sources**: the local process through `/proc`, or a JVM through Jolokia
//! - **Multiple output formats**: Pretty lines, JSON, CSV, YAML
//! - **Synthetic load**: `--load-threads` for demonstrations

pub mod cli;
pub mod config;
pub mod load;
pub mod output;

pub use cli::run;
