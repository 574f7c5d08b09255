//! Counter-to-rate normalization.
//!
//! Turns two readings of a cumulative time counter and of process uptime into
//! the share of total processor capacity spent on that counter during the
//! interval between them.
//!
//! ```text
//! deltaC = C_now * scale / procs - C_prev * scale / procs     (integer division per side)
//! deltaU = U_now * 1e6 - U_prev * 1e6                         (ms -> ns)
//! raw    = clamp(round(1000 * deltaC / deltaU), 0, 1000)      (0 when deltaU <= 0)
//! ```

use crate::types::{CounterReading, CpuTimes, Utilization};

/// Nanoseconds per millisecond, the uptime upsampling factor
pub const NANOS_PER_MILLI: u64 = 1_000_000;

const PERMILLE: i128 = Utilization::MAX_RAW as i128;

/// Unit of the cumulative counter fed to [`normalize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterUnit {
    /// CPU time in nanoseconds
    Nanos,
    /// GC pause time in milliseconds
    Millis,
}

impl CounterUnit {
    /// Factor that converts one counter unit into nanoseconds
    #[must_use]
    pub const fn nanos_per_unit(self) -> u64 {
        match self {
            Self::Nanos => 1,
            Self::Millis => NANOS_PER_MILLI,
        }
    }
}

/// Per-processor counter delta in nanoseconds.
///
/// Each side is scaled and divided by the processor count before the
/// subtraction, so truncation happens per side: `(3, 10, 4)` yields
/// `10/4 - 3/4 = 2`, not `(10 - 3)/4 = 1`. The result may differ from the
/// exact per-processor delta by one unit. A processor count of zero counts
/// as one.
#[must_use]
pub fn per_processor_delta(
    previous: u64,
    current: u64,
    unit: CounterUnit,
    processor_count: u32,
) -> i128 {
    let processors = i128::from(processor_count.max(1));
    let scale = i128::from(unit.nanos_per_unit());
    (i128::from(current) * scale) / processors - (i128::from(previous) * scale) / processors
}

/// Uptime delta in nanoseconds (may be zero or negative)
#[must_use]
pub fn uptime_delta_nanos(previous_millis: u64, current_millis: u64) -> i128 {
    let scale = i128::from(NANOS_PER_MILLI);
    i128::from(current_millis) * scale - i128::from(previous_millis) * scale
}

/// Utilization of `unit`-denominated counter time over the interval between
/// `previous` and `current`, normalized across `processor_count` processors.
///
/// A non-positive uptime delta yields 0.0. A counter that went backwards also
/// yields 0.0; anything above full capacity is clamped to 100.0.
#[must_use]
pub fn normalize(
    previous: CounterReading,
    current: CounterReading,
    unit: CounterUnit,
    processor_count: u32,
) -> Utilization {
    let uptime_delta = uptime_delta_nanos(previous.uptime_millis, current.uptime_millis);
    if uptime_delta <= 0 {
        return Utilization::ZERO;
    }

    let counter_delta = per_processor_delta(previous.counter, current.counter, unit, processor_count);
    if counter_delta <= 0 {
        return Utilization::ZERO;
    }

    // round half up of PERMILLE * counter_delta / uptime_delta, both positive
    let raw = (2 * PERMILLE * counter_delta + uptime_delta) / (2 * uptime_delta);
    Utilization::from_raw(u16::try_from(raw).unwrap_or(Utilization::MAX_RAW))
}

/// Busy share of machine processor time between two [`CpuTimes`] readings.
///
/// No uptime or processor count is involved: both sides already cover every
/// processor. An interval with no elapsed time yields 0.0, and a busy
/// counter that went backwards also yields 0.0.
#[must_use]
pub fn busy_share(previous: CpuTimes, current: CpuTimes) -> Utilization {
    let total_delta = i128::from(current.total()) - i128::from(previous.total());
    if total_delta <= 0 {
        return Utilization::ZERO;
    }

    let busy_delta = i128::from(current.busy) - i128::from(previous.busy);
    if busy_delta <= 0 {
        return Utilization::ZERO;
    }

    let raw = (2 * PERMILLE * busy_delta + total_delta) / (2 * total_delta);
    Utilization::from_raw(u16::try_from(raw).unwrap_or(Utilization::MAX_RAW))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(counter: u64, uptime_millis: u64) -> CounterReading {
        CounterReading::new(counter, uptime_millis)
    }

    #[test]
    fn test_half_of_one_core() {
        let usage = normalize(reading(0, 0), reading(500_000_000, 1000), CounterUnit::Nanos, 1);
        assert_eq!(usage.raw(), 500);
        assert_eq!(usage.percent(), 50.0);
    }

    #[test]
    fn test_identical_counters_are_idle() {
        let usage = normalize(
            reading(9_000_000, 4000),
            reading(9_000_000, 5000),
            CounterUnit::Nanos,
            4,
        );
        assert_eq!(usage, Utilization::ZERO);
    }

    #[test]
    fn test_non_positive_uptime_delta() {
        for (prev, now) in [(1000, 1000), (2000, 1000)] {
            let usage = normalize(reading(0, prev), reading(u64::MAX, now), CounterUnit::Nanos, 1);
            assert_eq!(usage.percent(), 0.0);
        }
    }

    #[test]
    fn test_divides_before_subtracting() {
        assert_eq!(per_processor_delta(3, 10, CounterUnit::Nanos, 4), 2);
        assert_ne!(per_processor_delta(3, 10, CounterUnit::Nanos, 4), (10 - 3) / 4);
    }

    #[test]
    fn test_millis_counter_is_upsampled() {
        assert_eq!(per_processor_delta(0, 3, CounterUnit::Millis, 2), 1_500_000);
        // 250 ms of GC over a 1 s interval on one processor
        let usage = normalize(reading(100, 1000), reading(350, 2000), CounterUnit::Millis, 1);
        assert_eq!(usage.percent(), 25.0);
    }

    #[test]
    fn test_doubling_processors_halves_delta() {
        let one = per_processor_delta(0, 800_000_000, CounterUnit::Nanos, 2);
        let two = per_processor_delta(0, 800_000_000, CounterUnit::Nanos, 4);
        assert_eq!(two * 2, one);

        let a = normalize(reading(0, 0), reading(800_000_000, 1000), CounterUnit::Nanos, 2);
        let b = normalize(reading(0, 0), reading(800_000_000, 1000), CounterUnit::Nanos, 4);
        assert_eq!(a.percent(), 40.0);
        assert_eq!(b.percent(), 20.0);
    }

    #[test]
    fn test_clamped_to_full() {
        let usage = normalize(reading(0, 0), reading(5_000_000_000, 1000), CounterUnit::Nanos, 1);
        assert_eq!(usage, Utilization::FULL);
    }

    #[test]
    fn test_backwards_counter_is_idle() {
        let usage = normalize(reading(900, 1000), reading(100, 2000), CounterUnit::Millis, 1);
        assert_eq!(usage, Utilization::ZERO);
    }

    #[test]
    fn test_rounds_to_nearest_tenth() {
        // 0.45 permille rounds down, 0.5 rounds up
        let down = normalize(reading(0, 0), reading(450_000, 1000), CounterUnit::Nanos, 1);
        assert_eq!(down.raw(), 0);
        let up = normalize(reading(0, 0), reading(500_000, 1000), CounterUnit::Nanos, 1);
        assert_eq!(up.raw(), 1);
        let mid = normalize(reading(0, 0), reading(123_456_789, 1000), CounterUnit::Nanos, 1);
        assert_eq!(mid.raw(), 123);
    }

    #[test]
    fn test_zero_processors_counts_as_one() {
        let usage = normalize(reading(0, 0), reading(500_000_000, 1000), CounterUnit::Nanos, 0);
        assert_eq!(usage.percent(), 50.0);
    }

    #[test]
    fn test_bounded_and_monotonic() {
        let uptimes = [1_u64, 7, 250, 1000, 60_000];
        let counters = [
            0_u64,
            1,
            999,
            1_000_000,
            123_456_789,
            1_000_000_000,
            40_000_000_000,
            u64::MAX / 2,
        ];
        for procs in [1_u32, 2, 3, 8, 64] {
            for &du in &uptimes {
                let mut last = Utilization::ZERO;
                for &dc in &counters {
                    let usage = normalize(reading(0, 5), reading(dc, 5 + du), CounterUnit::Nanos, procs);
                    let pct = usage.percent();
                    assert!((0.0..=100.0).contains(&pct), "{pct} out of range");
                    assert!(usage >= last, "not monotonic at dc={dc} du={du} procs={procs}");
                    last = usage;
                }
            }
        }
    }

    #[test]
    fn test_busy_share_of_machine() {
        let usage = busy_share(CpuTimes::new(100, 900), CpuTimes::new(350, 1650));
        assert_eq!(usage.percent(), 25.0);

        let fully_busy = busy_share(CpuTimes::new(0, 0), CpuTimes::new(400, 0));
        assert_eq!(fully_busy, Utilization::FULL);
    }

    #[test]
    fn test_busy_share_without_elapsed_time() {
        let same = CpuTimes::new(500, 500);
        assert_eq!(busy_share(same, same), Utilization::ZERO);
        assert_eq!(
            busy_share(CpuTimes::new(900, 100), CpuTimes::new(100, 200)),
            Utilization::ZERO
        );
    }

    #[test]
    fn test_busy_share_rounds_half_up() {
        // 1 busy jiffy out of 2000 is exactly 0.05%
        let usage = busy_share(CpuTimes::new(0, 0), CpuTimes::new(1, 1999));
        assert_eq!(usage.raw(), 1);
        let usage = busy_share(CpuTimes::new(0, 0), CpuTimes::new(1, 2001));
        assert_eq!(usage.raw(), 0);
    }
}
