//! Testing utilities and helpers
//!
//! - **[`time`]**: Time mocking utilities
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use wxkit_common::testing::MockClock;
//!
//! let clock = MockClock::new();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.elapsed(), Duration::from_secs(5));
//! ```

pub mod time;

pub use time::MockClock;
