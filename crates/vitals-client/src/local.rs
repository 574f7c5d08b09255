//! Counters of a local process read from `/proc`.
//!
//! A native process has no garbage collectors, so the GC sampler always
//! reports 0.0 against this source. Machine-wide CPU times come from the
//! aggregate `cpu` line of `/proc/stat`.

use async_trait::async_trait;
use procfs::prelude::*;
use procfs::process::Process;
use tracing::debug;
use vitals_core::{CollectorHandle, CpuTimes, HeapUsage, MetricsSource, Result, VitalsError};

/// Reads CPU time, uptime and memory of one process from `/proc`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcfsSource {
    pid: Option<i32>,
}

impl ProcfsSource {
    /// Watch the current process
    #[must_use]
    pub const fn current() -> Self {
        Self { pid: None }
    }

    /// Watch another process by pid
    #[must_use]
    pub const fn for_pid(pid: i32) -> Self {
        Self { pid: Some(pid) }
    }

    /// Pid being watched, `None` for the current process
    #[must_use]
    pub const fn pid(&self) -> Option<i32> {
        self.pid
    }

    fn process(&self) -> Result<Process> {
        let process = match self.pid {
            Some(pid) => Process::new(pid),
            None => Process::myself(),
        };
        process.map_err(procfs_error)
    }
}

fn procfs_error(e: procfs::ProcError) -> VitalsError {
    VitalsError::Procfs(e.to_string())
}

/// Number of CPUs in a `Cpus_allowed_list` given as inclusive ranges
fn count_allowed_cpus(ranges: &[(u32, u32)]) -> u32 {
    ranges
        .iter()
        .map(|&(first, last)| last.saturating_sub(first).saturating_add(1))
        .fold(0, u32::saturating_add)
}

/// Split aggregate jiffies into busy and idle time.
///
/// Guest time is already part of user time and is not added again.
fn split_cpu_time(time: &procfs::CpuTime) -> CpuTimes {
    let busy = [
        time.user,
        time.nice,
        time.system,
        time.irq.unwrap_or(0),
        time.softirq.unwrap_or(0),
        time.steal.unwrap_or(0),
    ]
    .into_iter()
    .fold(0, u64::saturating_add);
    let idle = time.idle.saturating_add(time.iowait.unwrap_or(0));
    CpuTimes::new(busy, idle)
}

#[async_trait]
impl MetricsSource for ProcfsSource {
    async fn process_cpu_time_nanos(&self) -> Result<u64> {
        let stat = self.process()?.stat().map_err(procfs_error)?;
        let ticks = u128::from(procfs::ticks_per_second().max(1));
        let nanos = u128::from(stat.utime + stat.stime) * 1_000_000_000 / ticks;
        Ok(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    async fn processing_capacity(&self) -> Result<Option<u64>> {
        Ok(None)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    async fn uptime_millis(&self) -> Result<u64> {
        let stat = self.process()?.stat().map_err(procfs_error)?;
        let system = procfs::Uptime::current().map_err(procfs_error)?;
        let ticks = procfs::ticks_per_second().max(1);

        let system_millis = (system.uptime * 1000.0) as u64;
        let started_millis = stat.starttime.saturating_mul(1000) / ticks;
        Ok(system_millis.saturating_sub(started_millis))
    }

    #[allow(clippy::cast_possible_truncation)]
    async fn available_processors(&self) -> Result<u32> {
        let status = self.process()?.status().map_err(procfs_error)?;
        if let Some(allowed) = status.cpus_allowed_list.as_deref() {
            let count = count_allowed_cpus(allowed);
            if count > 0 {
                return Ok(count);
            }
        }

        debug!("no Cpus_allowed_list, counting every listed cpu");
        let info = procfs::CpuInfo::current().map_err(procfs_error)?;
        Ok((info.num_cores() as u32).max(1))
    }

    async fn garbage_collectors(&self) -> Result<Vec<CollectorHandle>> {
        Ok(Vec::new())
    }

    async fn collection_time_millis(&self, collector: &CollectorHandle) -> Result<u64> {
        debug!(collector = %collector, "native process has no collectors");
        Err(VitalsError::CollectorNotFound {
            name: collector.id().to_string(),
        })
    }

    async fn heap_usage(&self) -> Result<HeapUsage> {
        let statm = self.process()?.statm().map_err(procfs_error)?;
        let page = procfs::page_size();
        let meminfo = procfs::Meminfo::current().map_err(procfs_error)?;

        Ok(HeapUsage {
            used_bytes: statm.resident.saturating_mul(page),
            committed_bytes: statm.size.saturating_mul(page),
            max_bytes: meminfo.mem_total,
        })
    }

    async fn machine_cpu_times(&self) -> Result<Option<CpuTimes>> {
        let stats = procfs::KernelStats::current().map_err(procfs_error)?;
        Ok(Some(split_cpu_time(&stats.total)))
    }
}
