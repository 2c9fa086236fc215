//! Per-tenant crypto configuration

use std::fmt;

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use wxkit_domain::constants::{AES_KEY_LEN, IV_LEN};
use wxkit_domain::{AppConfig, MessageConfig, Result, WxError};

/// The configured key carries two spare low bits in its last symbol that are
/// not guaranteed to be zero, so trailing bits must be tolerated.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Immutable crypto configuration for one integration.
///
/// The IV is the first 16 bytes of the key and is reused for every
/// operation; per-message randomness comes from the frame prefix.
#[derive(Clone)]
pub struct CryptoContext {
    key: [u8; AES_KEY_LEN],
    iv: [u8; IV_LEN],
    token: String,
    identity: String,
}

impl CryptoContext {
    /// Build a context from the verification token, the 43-character
    /// encoding key and the tenant identity (app id).
    ///
    /// # Errors
    /// Returns `WxError::Config` if the key is not valid base64 or does not
    /// decode to exactly 32 bytes.
    pub fn new(
        token: impl Into<String>,
        encoding_aes_key: &str,
        identity: impl Into<String>,
    ) -> Result<Self> {
        let decoded = KEY_ENGINE
            .decode(format!("{encoding_aes_key}="))
            .map_err(|e| WxError::Config(format!("Invalid encoding AES key: {e}")))?;

        let key: [u8; AES_KEY_LEN] = decoded.as_slice().try_into().map_err(|_| {
            WxError::Config(format!(
                "Invalid encoding AES key: decoded to {} bytes, expected {AES_KEY_LEN}",
                decoded.len()
            ))
        })?;

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&key[..IV_LEN]);

        Ok(Self { key, iv, token: token.into(), identity: identity.into() })
    }

    /// Build a context from loaded configuration.
    ///
    /// # Errors
    /// See [`CryptoContext::new`].
    pub fn from_config(app: &AppConfig, message: &MessageConfig) -> Result<Self> {
        Self::new(message.token.clone(), &message.encoding_aes_key, app.app_id.clone())
    }

    pub(crate) const fn key(&self) -> &[u8; AES_KEY_LEN] {
        &self.key
    }

    pub(crate) const fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Token used for message signatures.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// App id appended to every frame.
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl fmt::Debug for CryptoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoContext")
            .field("key", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .field("identity", &self.identity)
            .finish()
    }
}
