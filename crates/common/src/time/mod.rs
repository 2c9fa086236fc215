//! Time abstraction for code that reads the wall clock
//!
//! Credential freshness and signed timestamps both depend on "now". Taking a
//! [`Clock`] instead of calling [`SystemTime::now`] directly lets tests pin
//! time with `testing::MockClock` rather than sleeping.
//!
//! # Examples
//!
//! ```
//! use wxkit_common::time::{unix_timestamp, Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let millis = clock.millis_since_epoch();
//! assert!(millis / 1000 >= unix_timestamp(&clock) - 1);
//! ```

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Trait for time operations to enable testing
pub trait Clock: Send + Sync {
    /// Get current instant (monotonic time)
    fn now(&self) -> Instant;

    /// Get current system time (wall clock)
    fn system_time(&self) -> SystemTime;

    /// Get milliseconds since UNIX epoch
    ///
    /// A wall clock set before the epoch reads as `0`.
    fn millis_since_epoch(&self) -> u64 {
        let millis =
            self.system_time().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn system_time(&self) -> SystemTime {
        (**self).system_time()
    }

    fn millis_since_epoch(&self) -> u64 {
        (**self).millis_since_epoch()
    }
}

/// Current Unix timestamp in whole seconds.
pub fn unix_timestamp<C: Clock + ?Sized>(clock: &C) -> u64 {
    clock.millis_since_epoch() / 1000
}
