//! Test utilities: deterministic time sources.
//!
//! Available to downstream test crates behind the `test-utils` feature.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use shared_types::Timestamp;

use crate::ports::TimeSource;

/// Time source returning a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub u64);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.0)
    }
}

/// Thread-safe time source supporting explicit advancement.
///
/// Shared between the registry and the test body via `Arc` so the test can
/// move the clock past backoff and expiry windows.
#[derive(Debug, Default)]
pub struct ControllableTimeSource {
    millis: AtomicU64,
}

impl ControllableTimeSource {
    pub fn new(initial_millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(initial_millis),
        }
    }

    /// Advance the clock.
    pub fn advance(&self, duration: Duration) {
        self.millis
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }
}

impl TimeSource for ControllableTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}
