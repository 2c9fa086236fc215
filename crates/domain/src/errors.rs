//! Error types used throughout the workspace

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wxkit_common::{ErrorClassification, ErrorSeverity};

use crate::types::CredentialKind;

/// Main error type for WxKit
///
/// Every failure of the message security layer surfaces to the immediate
/// caller as one of these variants. None of them is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WxError {
    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `msg_signature` does not match the computed one.
    #[error("Signature mismatch: message signature does not match computed signature")]
    SignatureMismatch,

    /// A decrypted frame was addressed to another app.
    #[error("Identity mismatch: expected '{expected}', found '{found}'")]
    IdentityMismatch {
        /// Configured app id.
        expected: String,
        /// Identity carried by the frame.
        found: String,
    },

    /// The envelope has no `Encrypt` element.
    #[error("Ciphertext extraction failed: envelope has no Encrypt element")]
    CiphertextExtraction,

    /// Malformed base64, block length, padding or frame.
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// The issuer could not provide a credential.
    #[error("Credential acquisition failed for {kind}: {message}")]
    CredentialAcquisition {
        /// Credential that was requested.
        kind: CredentialKind,
        /// Issuer or transport failure description.
        message: String,
        /// Whether calling again may succeed.
        retryable: bool,
    },

    /// Transport failure or a 5xx response.
    #[error("Network error: {0}")]
    Network(String),

    /// Credential persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON or TOML could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Caller-supplied value was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invariant broken inside the library.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WxError {
    /// Build a [`WxError::CredentialAcquisition`].
    pub fn credential(kind: CredentialKind, message: impl Into<String>, retryable: bool) -> Self {
        Self::CredentialAcquisition { kind, message: message.into(), retryable }
    }

    /// Re-tag an issuer or transport failure as a credential acquisition
    /// failure for `kind`.
    ///
    /// Errors that already are credential failures pass through unchanged.
    #[must_use]
    pub fn into_acquisition(self, kind: CredentialKind) -> Self {
        match self {
            already @ Self::CredentialAcquisition { .. } => already,
            Self::Network(message) => Self::credential(kind, message, true),
            other => {
                let retryable = other.is_retryable();
                Self::credential(kind, other.to_string(), retryable)
            }
        }
    }

    /// True for the failures that mark a message as untrusted.
    #[must_use]
    pub const fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::SignatureMismatch | Self::IdentityMismatch { .. } | Self::CiphertextExtraction
        )
    }
}

impl ErrorClassification for WxError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::CredentialAcquisition { retryable, .. } => *retryable,
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SignatureMismatch | Self::IdentityMismatch { .. } | Self::Internal(_) => {
                ErrorSeverity::Critical
            }
            Self::Network(_) => ErrorSeverity::Warning,
            Self::CredentialAcquisition { retryable: true, .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl From<serde_json::Error> for WxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for WxKit operations
pub type Result<T> = std::result::Result<T, WxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tampering_errors_are_critical() {
        assert!(WxError::SignatureMismatch.is_critical());
        let identity =
            WxError::IdentityMismatch { expected: "wx1".into(), found: "wx2".into() };
        assert!(identity.is_critical());
        assert!(!identity.is_retryable());
        assert!(!WxError::CiphertextExtraction.is_critical());
    }

    #[test]
    fn network_failures_become_retryable_acquisition_errors() {
        let err = WxError::Network("connection reset".into())
            .into_acquisition(CredentialKind::AccessToken);
        assert_eq!(
            err,
            WxError::credential(CredentialKind::AccessToken, "connection reset", true)
        );
        assert!(err.is_retryable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn acquisition_errors_pass_through_unchanged() {
        let original = WxError::credential(CredentialKind::JsApiTicket, "errcode 40001", false);
        assert_eq!(original.clone().into_acquisition(CredentialKind::AccessToken), original);
    }

    #[test]
    fn other_errors_are_wrapped_non_retryable() {
        let err = WxError::Serialization("bad json".into())
            .into_acquisition(CredentialKind::AccessToken);
        match err {
            WxError::CredentialAcquisition { kind, message, retryable } => {
                assert_eq!(kind, CredentialKind::AccessToken);
                assert!(message.contains("bad json"));
                assert!(!retryable);
            }
            other => panic!("expected credential acquisition, got {other:?}"),
        }
    }

    #[test]
    fn verification_failures_are_grouped() {
        assert!(WxError::CiphertextExtraction.is_verification_failure());
        assert!(WxError::SignatureMismatch.is_verification_failure());
        assert!(!WxError::Decryption("short".into()).is_verification_failure());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(WxError::Config("bad key".into())).unwrap();
        assert_eq!(json["type"], "Config");
        assert_eq!(json["message"], "bad key");

        let unit = serde_json::to_value(WxError::SignatureMismatch).unwrap();
        assert_eq!(unit["type"], "SignatureMismatch");
    }
}
