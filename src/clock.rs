//! Wall-clock abstraction for the timer store.
//!
//! All timer bookkeeping is done against absolute epoch milliseconds so that
//! remaining time can be rederived after the process was suspended. The
//! [`Clock`] trait lets tests drive time by hand with [`ManualClock`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ============================================================================
// Clock
// ============================================================================

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time as epoch milliseconds.
    fn now_ms(&self) -> u64;
}

/// Clock backed by the operating system's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Clock whose time only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at `start_ms`.
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Jumps the clock to an absolute time.
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Whole seconds left until `end_time_ms`, floored and clamped at zero.
#[must_use]
pub fn remaining_seconds(end_time_ms: u64, now_ms: u64) -> u32 {
    let left = end_time_ms.saturating_sub(now_ms) / MS_PER_SECOND;
    u32::try_from(left).unwrap_or(u32::MAX)
}

/// Absolute end time for a countdown of `seconds` starting at `now_ms`.
#[must_use]
pub fn end_time_after(now_ms: u64, seconds: u32) -> u64 {
    now_ms + u64::from(seconds) * MS_PER_SECOND
}

// ============================================================================
// Tests
// ============================================================================
