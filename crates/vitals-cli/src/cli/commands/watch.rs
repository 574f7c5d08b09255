//! `vitals watch` - Periodic utilization sampling.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vitals::{MetricsSource, SamplerKind, Scheduler, SchedulerConfig};

use super::Context;
use crate::cli::args::WatchArgs;
use crate::load::LoadGenerator;
use crate::output::ConsoleReporter;

pub async fn execute(ctx: Context, args: WatchArgs) -> Result<()> {
    let source = ctx.source(&args.source)?;

    let timing = SchedulerConfig::new()
        .with_initial_delay(Duration::from_millis(
            args.initial_delay_ms.unwrap_or(ctx.config.initial_delay_ms),
        ))
        .with_period(Duration::from_millis(
            args.period_ms.unwrap_or(ctx.config.period_ms),
        ));

    let mut kinds = if args.samplers.is_empty() {
        ctx.config.samplers.clone()
    } else {
        args.samplers.clone()
    };
    if args.system && !kinds.contains(&SamplerKind::System) {
        kinds.push(SamplerKind::System);
    }
    if kinds.is_empty() {
        anyhow::bail!("No samplers selected. Use --samplers cpu,gc,memory");
    }
    if kinds.contains(&SamplerKind::System) && source.machine_cpu_times().await?.is_none() {
        anyhow::bail!("Machine CPU usage needs the local source. Use --source local");
    }

    let scheduler = Scheduler::for_kinds(timing, &kinds, source.as_ref()).await;
    let reporter = Arc::new(ConsoleReporter::stdout(ctx.output_format));

    let load = if args.load_threads > 0 {
        Some(LoadGenerator::start(args.load_threads)?)
    } else {
        None
    };

    let handle = match scheduler.start(source, reporter) {
        Ok(handle) => handle,
        Err(e) => {
            if let Some(load) = load {
                load.stop();
            }
            return Err(e.into());
        }
    };
    info!(samplers = ?kinds, "watching; press Ctrl-C to stop");

    let stopped = wait_for_stop(args.duration_secs).await;

    let summaries = handle.shutdown().await;
    if let Some(load) = load {
        load.stop();
    }
    stopped?;

    eprintln!();
    eprintln!("{}", "Summary:".bold());
    for summary in summaries {
        eprintln!("  {summary}");
    }

    Ok(())
}

/// Wait for Ctrl-C, or for `duration_secs` if given
async fn wait_for_stop(duration_secs: Option<u64>) -> std::io::Result<()> {
    match duration_secs {
        Some(secs) => {
            tokio::select! {
                () = tokio::time::sleep(Duration::from_secs(secs)) => Ok(()),
                result = tokio::signal::ctrl_c() => result,
            }
        }
        None => tokio::signal::ctrl_c().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_stop_after_duration() {
        let started = tokio::time::Instant::now();
        wait_for_stop(Some(3)).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
    }
}
