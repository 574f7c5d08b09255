//! In-memory metrics source for tests and demos.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::MetricsSource;
use crate::error::{Result, VitalsError};
use crate::types::{CollectorHandle, CpuTimes, HeapUsage};

/// Individual counter reads, used to script failures and count calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Counter {
    CpuTime,
    ProcessingCapacity,
    Uptime,
    Processors,
    Collectors,
    CollectionTime,
    Heap,
    MachineCpu,
}

/// Current values served by a [`ScriptedSource`]
#[derive(Debug, Clone)]
pub struct ScriptState {
    pub cpu_time_nanos: u64,
    pub processing_capacity: Option<u64>,
    pub uptime_millis: u64,
    pub processor_count: u32,
    /// Collector id -> cumulative collection time in ms
    pub collectors: BTreeMap<String, u64>,
    /// Collectors that are enumerated but no longer readable
    pub vanished: BTreeSet<String>,
    pub heap: HeapUsage,
    /// Machine-wide times, `None` to behave like a single-process source
    pub machine_cpu: Option<CpuTimes>,
    failing: BTreeSet<Counter>,
}

impl Default for ScriptState {
    fn default() -> Self {
        Self {
            cpu_time_nanos: 0,
            processing_capacity: None,
            uptime_millis: 0,
            processor_count: 1,
            collectors: BTreeMap::new(),
            vanished: BTreeSet::new(),
            heap: HeapUsage::default(),
            machine_cpu: None,
            failing: BTreeSet::new(),
        }
    }
}

impl ScriptState {
    /// Set the cumulative time of a collector, adding it if absent
    pub fn set_collector(&mut self, id: &str, millis: u64) {
        self.collectors.insert(id.to_string(), millis);
    }

    /// Drop a collector from the enumeration
    pub fn remove_collector(&mut self, id: &str) {
        self.collectors.remove(id);
    }

    /// Move CPU time and uptime forward
    pub fn advance(&mut self, cpu_nanos: u64, uptime_millis: u64) {
        self.cpu_time_nanos += cpu_nanos;
        self.uptime_millis += uptime_millis;
    }

    /// Make every read of `counter` fail until [`ScriptState::recover`]
    pub fn fail(&mut self, counter: Counter) {
        self.failing.insert(counter);
    }

    /// Stop failing reads of `counter`
    pub fn recover(&mut self, counter: Counter) {
        self.failing.remove(&counter);
    }
}

/// Metrics source whose counters the caller sets between ticks.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    state: Mutex<ScriptState>,
    calls: Mutex<HashMap<Counter, usize>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ScriptState) -> Self {
        Self {
            state: Mutex::new(state),
            calls: Mutex::default(),
        }
    }

    /// Mutate the served values
    pub fn update(&self, f: impl FnOnce(&mut ScriptState)) {
        f(&mut self.lock());
    }

    /// Number of reads of `counter` so far, failed ones included
    pub fn calls(&self, counter: Counter) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&counter)
            .copied()
            .unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, counter: Counter, f: impl FnOnce(&ScriptState) -> Result<T>) -> Result<T> {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(counter)
            .or_default() += 1;

        let state = self.lock();
        if state.failing.contains(&counter) {
            return Err(VitalsError::SourceUnavailable(format!(
                "scripted failure reading {counter:?}"
            )));
        }
        f(&state)
    }
}

#[async_trait]
impl MetricsSource for ScriptedSource {
    async fn process_cpu_time_nanos(&self) -> Result<u64> {
        self.read(Counter::CpuTime, |s| Ok(s.cpu_time_nanos))
    }

    async fn processing_capacity(&self) -> Result<Option<u64>> {
        self.read(Counter::ProcessingCapacity, |s| Ok(s.processing_capacity))
    }

    async fn uptime_millis(&self) -> Result<u64> {
        self.read(Counter::Uptime, |s| Ok(s.uptime_millis))
    }

    async fn available_processors(&self) -> Result<u32> {
        self.read(Counter::Processors, |s| Ok(s.processor_count))
    }

    async fn garbage_collectors(&self) -> Result<Vec<CollectorHandle>> {
        self.read(Counter::Collectors, |s| {
            Ok(s.collectors
                .keys()
                .chain(s.vanished.iter())
                .map(CollectorHandle::new)
                .collect())
        })
    }

    async fn collection_time_millis(&self, collector: &CollectorHandle) -> Result<u64> {
        self.read(Counter::CollectionTime, |s| {
            s.collectors
                .get(collector.id())
                .copied()
                .ok_or_else(|| VitalsError::CollectorNotFound {
                    name: collector.id().to_string(),
                })
        })
    }

    async fn heap_usage(&self) -> Result<HeapUsage> {
        self.read(Counter::Heap, |s| Ok(s.heap))
    }

    async fn machine_cpu_times(&self) -> Result<Option<CpuTimes>> {
        self.read(Counter::MachineCpu, |s| Ok(s.machine_cpu))
    }
}
