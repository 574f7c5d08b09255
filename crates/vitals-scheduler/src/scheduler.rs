//! Periodic sampler tasks.

use futures_util::future::join_all;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use vitals_core::sampler::{sampler_for, Sampler};
use vitals_core::{MetricsSource, Reporter, Result, SamplerKind};

use crate::config::SchedulerConfig;

/// Samplers waiting to be started
pub struct Scheduler {
    config: SchedulerConfig,
    samplers: Vec<Box<dyn Sampler>>,
}

impl Scheduler {
    /// Create a scheduler with no samplers
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            samplers: Vec::new(),
        }
    }

    /// Create a scheduler with the standard sampler for each kind.
    ///
    /// Duplicate kinds are registered once.
    pub async fn for_kinds(
        config: SchedulerConfig,
        kinds: &[SamplerKind],
        source: &dyn MetricsSource,
    ) -> Self {
        let mut scheduler = Self::new(config);
        for kind in SamplerKind::ALL {
            if kinds.contains(&kind) {
                scheduler.register(sampler_for(kind, source).await);
            }
        }
        scheduler
    }

    /// Add a sampler
    pub fn register(&mut self, sampler: Box<dyn Sampler>) {
        self.samplers.push(sampler);
    }

    /// Kinds of the registered samplers, in registration order
    pub fn kinds(&self) -> Vec<SamplerKind> {
        self.samplers.iter().map(|s| s.kind()).collect()
    }

    /// Spawn one task per sampler on the current tokio runtime.
    ///
    /// All tasks share the same first tick instant.
    pub fn start(
        self,
        source: Arc<dyn MetricsSource>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<SchedulerHandle> {
        self.config.validate()?;

        let token = CancellationToken::new();
        let first_tick = Instant::now() + self.config.initial_delay;
        let period = self.config.period;

        info!(
            samplers = self.samplers.len(),
            initial_delay = ?self.config.initial_delay,
            period = ?period,
            "starting scheduler"
        );

        let tasks = self
            .samplers
            .into_iter()
            .map(|sampler| {
                let kind = sampler.kind();
                let task = SamplerTask {
                    sampler,
                    source: Arc::clone(&source),
                    reporter: Arc::clone(&reporter),
                    token: token.clone(),
                };
                (kind, tokio::spawn(task.run(first_tick, period)))
            })
            .collect();

        Ok(SchedulerHandle { token, tasks })
    }
}

struct SamplerTask {
    sampler: Box<dyn Sampler>,
    source: Arc<dyn MetricsSource>,
    reporter: Arc<dyn Reporter>,
    token: CancellationToken,
}

impl SamplerTask {
    async fn run(mut self, first_tick: Instant, period: std::time::Duration) -> TaskSummary {
        let kind = self.sampler.kind();
        let mut summary = TaskSummary::new(kind);

        let mut interval = time::interval_at(first_tick, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            tokio::select! {
                biased;
                () = self.token.cancelled() => break,
                _ = interval.tick() => {}
            }

            match self.sampler.tick(self.source.as_ref()).await {
                Ok(report) => {
                    summary.ticks_completed += 1;
                    self.reporter.report(&report);
                }
                Err(e) => {
                    summary.ticks_failed += 1;
                    self.reporter.report_error(kind, &e);
                }
            }
        }

        debug!(
            sampler = %kind,
            completed = summary.ticks_completed,
            failed = summary.ticks_failed,
            "sampler stopped"
        );
        summary
    }
}

/// Running scheduler
pub struct SchedulerHandle {
    token: CancellationToken,
    tasks: Vec<(SamplerKind, JoinHandle<TaskSummary>)>,
}

impl SchedulerHandle {
    /// Ask every task to stop after its current tick
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Whether a stop has been requested
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token that stops the scheduler when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stop every task, wait for in-flight ticks to finish and collect
    /// per-sampler counts.
    pub async fn shutdown(self) -> Vec<TaskSummary> {
        self.token.cancel();

        let (kinds, handles): (Vec<_>, Vec<_>) = self.tasks.into_iter().unzip();
        let results = join_all(handles).await;

        kinds
            .into_iter()
            .zip(results)
            .map(|(kind, result)| {
                result.unwrap_or_else(|e| {
                    error!(sampler = %kind, error = %e, "sampler task aborted");
                    TaskSummary::new(kind)
                })
            })
            .collect()
    }
}

/// Tick counts of one sampler task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSummary {
    /// Sampler the task drove
    pub kind: SamplerKind,
    /// Ticks that produced a report
    pub ticks_completed: u64,
    /// Ticks that failed on the source
    pub ticks_failed: u64,
}

impl TaskSummary {
    const fn new(kind: SamplerKind) -> Self {
        Self {
            kind,
            ticks_completed: 0,
            ticks_failed: 0,
        }
    }
}

impl fmt::Display for TaskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ticks, {} failed",
            self.kind, self.ticks_completed, self.ticks_failed
        )
    }
}
