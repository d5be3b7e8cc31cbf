//! Wall-clock abstraction.
//!
//! Credential expiry and event timestamps are absolute UTC instants, so the
//! clock hands out `DateTime<Utc>` rather than a monotonic `Instant`. Tests
//! swap in [`MockClock`](crate::testing::MockClock) to move time without
//! sleeping.

use chrono::{DateTime, Utc};

/// Source of the current UTC instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
