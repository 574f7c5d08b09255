//! Synthetic allocation load for demonstrations.

use std::hint::black_box;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Threads allocating small buffers until stopped
pub struct LoadGenerator {
    stop: Arc<AtomicBool>,
    threads: Vec<JoinHandle<u64>>,
}

impl LoadGenerator {
    /// Spawn `threads` allocating threads
    pub fn start(threads: usize) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let handles = (0..threads)
            .map(|i| {
                let stop = Arc::clone(&stop);
                thread::Builder::new()
                    .name(format!("vitals-load-{i}"))
                    .spawn(move || allocate_until(&stop))
            })
            .collect::<std::io::Result<Vec<_>>>()?;

        info!(threads, "load generator started");
        Ok(Self {
            stop,
            threads: handles,
        })
    }

    /// Stop all threads and return the number of buffers they allocated
    pub fn stop(self) -> u64 {
        self.stop.store(true, Ordering::Relaxed);
        let total = self
            .threads
            .into_iter()
            .filter_map(|t| t.join().ok())
            .sum();
        debug!(allocations = total, "load generator stopped");
        total
    }
}

fn allocate_until(stop: &AtomicBool) -> u64 {
    let mut count = 0_u64;
    while !stop.load(Ordering::Relaxed) {
        black_box(vec![0_u8; 1024]);
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_threads_allocate_until_stopped() {
        let load = LoadGenerator::start(2).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(load.stop() > 0);
    }

    #[test]
    fn test_zero_threads() {
        assert_eq!(LoadGenerator::start(0).unwrap().stop(), 0);
    }
}
