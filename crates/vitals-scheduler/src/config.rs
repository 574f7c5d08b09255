//! Scheduler timing.

use std::time::Duration;
use vitals_core::{Result, VitalsError};

/// Timing shared by all sampler tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Wait before the first tick
    pub initial_delay: Duration,

    /// Time between consecutive tick starts
    pub period: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            period: Duration::from_secs(1),
        }
    }
}

impl SchedulerConfig {
    /// Create a config with the default one second delay and period
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial delay
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the period
    #[must_use]
    pub const fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Reject timings the scheduler cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.period.is_zero() {
            return Err(VitalsError::Config("period must be greater than zero".into()));
        }
        Ok(())
    }
}
