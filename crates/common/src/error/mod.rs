//! Error classification shared across WxKit crates
//!
//! Crate-specific error enums stay in their own crates; this module only
//! provides the vocabulary they use to describe themselves to callers that
//! make retry, alerting and logging decisions:
//!
//! - **`ErrorClassification` trait**: retryability, severity, criticality
//! - **`ErrorSeverity` enum**: a unified severity scale
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Missing cache entry |
//! | **Warning** | Degraded but operational | Transient upstream failure |
//! | **Error** | Failure requiring attention | Invalid input, config errors |
//! | **Critical** | Integrity at risk | Forged signature, foreign identity |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use wxkit_common::error::{ErrorClassification, ErrorSeverity};
//!
//! enum FetchError {
//!     Timeout,
//!     Rejected,
//! }
//!
//! impl ErrorClassification for FetchError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Timeout => ErrorSeverity::Warning,
//!             Self::Rejected => ErrorSeverity::Error,
//!         }
//!     }
//!
//!     fn is_critical(&self) -> bool {
//!         false
//!     }
//!
//!     fn retry_after(&self) -> Option<Duration> {
//!         None
//!     }
//! }
//!
//! assert!(FetchError::Timeout.is_retryable());
//! assert_eq!(FetchError::Rejected.severity().to_string(), "ERROR");
//! ```

use std::fmt;
use std::time::Duration;

/// Trait for classifying errors by their characteristics
///
/// Implement this for every public error type so that callers can make
/// uniform decisions without matching on concrete variants.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as network timeouts or a temporarily unavailable issuer.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for monitoring, alerting, and logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    ///
    /// Returns `None` if no specific delay is suggested.
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl ErrorSeverity {
    /// Map the severity onto a `tracing`-style level name.
    #[must_use]
    pub const fn as_level_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
