//! Wall-clock source for expiry calculation.

use chrono::Utc;
use std::fmt::Debug;

/// Source of the current unix time in seconds.
pub trait Clock: Send + Sync + Debug {
    /// Current unix-epoch seconds.
    fn now_unix(&self) -> i64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}
