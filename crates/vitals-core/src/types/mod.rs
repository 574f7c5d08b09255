mod common;
mod counters;
mod report;

pub use common::*;
pub use counters::*;
pub use report::*;
