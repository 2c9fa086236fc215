//! Mock clock for deterministic tests
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use wxkit_common::testing::MockClock;
//! use wxkit_common::time::Clock;
//!
//! let clock = MockClock::at_millis(1_409_659_813_000);
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.millis_since_epoch(), 1_409_659_818_000);
//! ```

// Test utility: a poisoned mutex should fail the test immediately
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::time::Clock;

/// Mock clock for deterministic testing
///
/// Time only moves when [`MockClock::advance`] or
/// [`MockClock::set_elapsed`] is called. Clones share the same elapsed time,
/// so a clone handed to the code under test observes every adjustment.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
    base_system_time: SystemTime,
}

impl MockClock {
    /// Create a new mock clock anchored at the current real time.
    pub fn new() -> Self {
        Self::at(SystemTime::now())
    }

    /// Create a mock clock whose wall clock starts at `base`.
    pub fn at(base: SystemTime) -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            base_system_time: base,
        }
    }

    /// Create a mock clock whose wall clock reads `millis` since the epoch.
    pub fn at_millis(millis: u64) -> Self {
        Self::at(UNIX_EPOCH + Duration::from_millis(millis))
    }

    /// Advance the mock clock by a duration
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().expect("mutex poisoned");
        *elapsed += duration;
    }

    /// Set the mock clock to a specific elapsed time
    ///
    /// This replaces any previous elapsed time.
    pub fn set_elapsed(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().expect("mutex poisoned");
        *elapsed = duration;
    }

    /// Get the current elapsed time
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().expect("mutex poisoned")
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn system_time(&self) -> SystemTime {
        self.base_system_time + self.elapsed()
    }
}
