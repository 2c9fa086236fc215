//! Cached authorization artifacts (access tokens, JS-API tickets)

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{
    CREDENTIAL_SAFETY_MARGIN_MS, DEFAULT_CREDENTIAL_TTL_SECONDS, ISSUER_TTL_FIELD,
    PERSISTED_TIME_FIELD, PERSISTED_TTL_FIELD,
};
use crate::errors::{Result, WxError};
use crate::impl_wire_name_conversions;

/// Kind of credential held by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Token authorising API calls.
    AccessToken,
    /// Ticket for signing web SDK configurations. Requires an access token.
    JsApiTicket,
}

impl_wire_name_conversions!(CredentialKind {
    AccessToken => "access_token",
    JsApiTicket => "jsapi_ticket",
});

impl CredentialKind {
    /// All kinds, in acquisition order.
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::JsApiTicket];

    /// Field holding the credential value in issuer responses and persisted
    /// JSON.
    #[must_use]
    pub const fn value_field(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::JsApiTicket => "ticket",
        }
    }

    /// Credential that must be presented to the issuer to obtain this kind.
    #[must_use]
    pub const fn bearer_kind(self) -> Option<Self> {
        match self {
            Self::AccessToken => None,
            Self::JsApiTicket => Some(Self::AccessToken),
        }
    }
}

/// What an issuer hands back before the cache stamps it.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialGrant {
    /// The credential itself.
    pub value: String,
    /// `None` when the issuer omitted the validity window.
    pub ttl_seconds: Option<u64>,
    /// Any other response fields, kept for persistence.
    pub extra: Map<String, Value>,
}

impl CredentialGrant {
    /// Grant without a validity window or extra fields.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), ttl_seconds: None, extra: Map::new() }
    }

    /// Set the validity window in seconds.
    #[must_use]
    pub const fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    /// Parse an issuer response body.
    ///
    /// Reads the kind's value field and `expires_in` (falling back to
    /// `expire_in`). `errcode`/`errmsg` are not carried over.
    ///
    /// # Errors
    /// Returns `WxError::Serialization` when the body is not an object or the
    /// value field is missing or not a string.
    pub fn from_response(kind: CredentialKind, body: &Value) -> Result<Self> {
        let object = body.as_object().ok_or_else(|| {
            WxError::Serialization(format!("{kind} response is not a JSON object"))
        })?;

        let value = object
            .get(kind.value_field())
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                WxError::Serialization(format!(
                    "{kind} response is missing '{}'",
                    kind.value_field()
                ))
            })?;

        let ttl_seconds = read_ttl(object, &[ISSUER_TTL_FIELD, PERSISTED_TTL_FIELD]);

        let extra = object
            .iter()
            .filter(|(key, _)| {
                !matches!(
                    key.as_str(),
                    "errcode" | "errmsg" | ISSUER_TTL_FIELD | PERSISTED_TTL_FIELD
                ) && key.as_str() != kind.value_field()
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self { value: value.to_string(), ttl_seconds, extra })
    }
}

impl fmt::Debug for CredentialGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialGrant")
            .field("value", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

/// A credential stamped with its issuance time.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// What this credential grants.
    pub kind: CredentialKind,
    /// The credential itself.
    pub value: String,
    /// Milliseconds since the Unix epoch at acquisition.
    pub issued_at_ms: u64,
    /// Validity window in seconds.
    pub ttl_seconds: u64,
    /// Issuer fields persisted alongside the value.
    pub extra: Map<String, Value>,
}

impl Credential {
    /// Credential without extra fields.
    pub fn new(
        kind: CredentialKind,
        value: impl Into<String>,
        issued_at_ms: u64,
        ttl_seconds: u64,
    ) -> Self {
        Self { kind, value: value.into(), issued_at_ms, ttl_seconds, extra: Map::new() }
    }

    /// Stamp an issuer grant with `issued_at_ms`.
    #[must_use]
    pub fn from_grant(kind: CredentialKind, grant: CredentialGrant, issued_at_ms: u64) -> Self {
        Self {
            kind,
            value: grant.value,
            issued_at_ms,
            ttl_seconds: grant.ttl_seconds.unwrap_or(DEFAULT_CREDENTIAL_TTL_SECONDS),
            extra: grant.extra,
        }
    }

    /// Whether the credential may still be handed out at `now_ms`.
    ///
    /// Usable while `now - issued_at <= ttl * 1000 - 5000`. A window shorter
    /// than the safety margin is never usable; an issue time in the future
    /// counts as zero age.
    #[must_use]
    pub fn is_usable_at(&self, now_ms: u64) -> bool {
        if self.value.is_empty() {
            return false;
        }
        let window_ms = self.ttl_seconds.saturating_mul(1000);
        let Some(usable_ms) = window_ms.checked_sub(CREDENTIAL_SAFETY_MARGIN_MS) else {
            return false;
        };
        now_ms.saturating_sub(self.issued_at_ms) <= usable_ms
    }

    /// Last millisecond at which [`Self::is_usable_at`] holds.
    #[must_use]
    pub fn refresh_due_at_ms(&self) -> u64 {
        self.issued_at_ms.saturating_add(
            self.ttl_seconds.saturating_mul(1000).saturating_sub(CREDENTIAL_SAFETY_MARGIN_MS),
        )
    }

    /// Persisted JSON form: `{<field>: value, expire_in, _time, ...extra}`.
    #[must_use]
    pub fn to_persisted(&self) -> Value {
        let mut object = self.extra.clone();
        object.insert(self.kind.value_field().to_string(), Value::from(self.value.clone()));
        object.insert(PERSISTED_TTL_FIELD.to_string(), Value::from(self.ttl_seconds));
        object.insert(PERSISTED_TIME_FIELD.to_string(), Value::from(self.issued_at_ms));
        Value::Object(object)
    }

    /// Rebuild a credential from its persisted JSON form.
    ///
    /// A missing `_time` yields issue time `0`, which is always stale. A
    /// missing validity window falls back to 7200 seconds.
    ///
    /// # Errors
    /// Returns `WxError::Serialization` when the document is not an object or
    /// lacks the kind's value field.
    pub fn from_persisted(kind: CredentialKind, document: &Value) -> Result<Self> {
        let object = document.as_object().ok_or_else(|| {
            WxError::Serialization(format!("persisted {kind} is not a JSON object"))
        })?;

        let value = object.get(kind.value_field()).and_then(Value::as_str).ok_or_else(|| {
            WxError::Serialization(format!(
                "persisted {kind} is missing '{}'",
                kind.value_field()
            ))
        })?;

        let ttl_seconds = read_ttl(object, &[PERSISTED_TTL_FIELD, ISSUER_TTL_FIELD])
            .unwrap_or(DEFAULT_CREDENTIAL_TTL_SECONDS);
        let issued_at_ms = object.get(PERSISTED_TIME_FIELD).and_then(Value::as_u64).unwrap_or(0);

        let extra = object
            .iter()
            .filter(|(key, _)| {
                !matches!(key.as_str(), PERSISTED_TIME_FIELD | PERSISTED_TTL_FIELD | ISSUER_TTL_FIELD)
                    && key.as_str() != kind.value_field()
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self { kind, value: value.to_string(), issued_at_ms, ttl_seconds, extra })
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind)
            .field("value", &"[REDACTED]")
            .field("issued_at_ms", &self.issued_at_ms)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

/// First positive integer found under `fields`. Zero and non-numeric values
/// are treated as absent.
fn read_ttl(object: &Map<String, Value>, fields: &[&str]) -> Option<u64> {
    fields
        .iter()
        .filter_map(|field| object.get(*field))
        .find_map(|value| match value {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.parse::<u64>().ok(),
            _ => None,
        })
        .filter(|ttl| *ttl > 0)
}
