//! Controllable wall clock

// Test double: the mutex cannot be poisoned with parking_lot.
#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use crate::time::Clock;

/// Mock clock for deterministic testing
///
/// Starts at a fixed instant and only moves when told to. Clones share the
/// same underlying time.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use studylens_common::testing::MockClock;
/// use studylens_common::Clock;
///
/// let clock = MockClock::new();
/// let start = clock.now();
///
/// // Simulate 5 seconds passing
/// clock.advance(Duration::from_secs(5));
///
/// assert_eq!((clock.now() - start).num_seconds(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Clock pinned to 2024-01-01T00:00:00Z.
    pub fn new() -> Self {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
        Self::at(epoch)
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(instant)) }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        let delta = chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
        let mut now = self.now.lock();
        *now += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
