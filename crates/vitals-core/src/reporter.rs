//! The sink for completed ticks.

use std::sync::{Mutex, PoisonError};
use tracing::warn;

use crate::error::VitalsError;
use crate::types::{SamplerKind, TickReport};

/// Receives one call per tick, from whichever task ran it.
pub trait Reporter: Send + Sync {
    /// A tick completed
    fn report(&self, report: &TickReport);

    /// A tick was skipped because the source failed
    fn report_error(&self, kind: SamplerKind, error: &VitalsError) {
        warn!(sampler = %kind, error = %error, "tick skipped");
    }
}

/// Reporter that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: Mutex<Vec<TickReport>>,
    errors: Mutex<Vec<(SamplerKind, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far, in arrival order
    pub fn reports(&self) -> Vec<TickReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reports of one sampler, in arrival order
    pub fn reports_of(&self, kind: SamplerKind) -> Vec<TickReport> {
        self.reports()
            .into_iter()
            .filter(|r| r.kind() == kind)
            .collect()
    }

    /// Error messages received so far
    pub fn errors(&self) -> Vec<(SamplerKind, String)> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, report: &TickReport) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*report);
    }

    fn report_error(&self, kind: SamplerKind, error: &VitalsError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, error.to_string()));
    }
}
