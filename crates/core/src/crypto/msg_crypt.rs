//! Callback message encryption and verification
//!
//! `MessageCrypt` is the entry point for inbound callbacks and outbound
//! encrypted replies. Inbound messages are always verified before any
//! ciphertext is decrypted.

use tracing::{debug, instrument};
use wxkit_common::{unix_timestamp, Clock, SystemClock};
use wxkit_domain::constants::REPLY_NONCE_LEN;
use wxkit_domain::{AppConfig, MessageConfig, Result, WxError};

use super::codec;
use super::context::CryptoContext;
use super::envelope::{build_envelope, extract_ciphertext};
use super::frame::{build_frame, parse_frame};
use crate::signing::{message_signature, nonce, NonceCharset};

/// Encrypts, decrypts and signs callback messages for one app.
#[derive(Debug, Clone)]
pub struct MessageCrypt {
    ctx: CryptoContext,
}

impl MessageCrypt {
    /// Wrap an already validated context.
    pub fn new(ctx: CryptoContext) -> Self {
        Self { ctx }
    }

    /// # Errors
    /// Returns `WxError::Config` if the encoding key is malformed.
    pub fn from_config(app: &AppConfig, message: &MessageConfig) -> Result<Self> {
        CryptoContext::from_config(app, message).map(Self::new)
    }

    /// Key material and identity used by this instance.
    pub fn context(&self) -> &CryptoContext {
        &self.ctx
    }

    /// `MsgSignature` for a ciphertext under this app's token.
    pub fn signature(&self, timestamp: &str, nonce: &str, encrypt: &str) -> String {
        message_signature(self.ctx.token(), timestamp, nonce, encrypt)
    }

    /// # Errors
    /// Returns `WxError::SignatureMismatch` if `signature` does not match.
    pub fn verify_signature(
        &self,
        signature: &str,
        timestamp: &str,
        nonce: &str,
        encrypt: &str,
    ) -> Result<()> {
        let expected = self.signature(timestamp, nonce, encrypt);
        if crate::signing::constant_time_eq(&expected, signature) {
            Ok(())
        } else {
            debug!(timestamp, nonce, "message signature mismatch");
            Err(WxError::SignatureMismatch)
        }
    }

    /// Frame and encrypt `payload`, returning base64 ciphertext.
    ///
    /// # Errors
    /// Returns `WxError::InvalidInput` if the payload is longer than a `u32`
    /// length prefix allows.
    pub fn encrypt(&self, payload: &str) -> Result<String> {
        let frame = build_frame(payload.as_bytes(), self.ctx.identity())?;
        codec::encrypt(&self.ctx, &frame)
    }

    /// Decrypt base64 ciphertext and return the payload after the identity
    /// check.
    ///
    /// # Errors
    /// - `WxError::Decryption` for malformed ciphertext or frames
    /// - `WxError::IdentityMismatch` if the frame belongs to another app
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let plaintext = codec::decrypt(&self.ctx, ciphertext)?;
        parse_frame(&plaintext, self.ctx.identity()).map(|frame| frame.payload)
    }

    /// Encrypt a reply and wrap it in a signed envelope.
    ///
    /// # Errors
    /// See [`MessageCrypt::encrypt`].
    pub fn encrypt_message(&self, reply: &str, timestamp: &str, nonce: &str) -> Result<String> {
        let ciphertext = self.encrypt(reply)?;
        let signature = self.signature(timestamp, nonce, &ciphertext);
        Ok(build_envelope(&ciphertext, &signature, timestamp, nonce))
    }

    /// `encrypt_message` stamped with the current time and a fresh nonce.
    ///
    /// # Errors
    /// See [`MessageCrypt::encrypt`].
    pub fn encrypt_message_now(&self, reply: &str) -> Result<String> {
        self.encrypt_message_at(reply, &SystemClock)
    }

    /// `encrypt_message` stamped with `clock`'s time and a fresh nonce.
    ///
    /// # Errors
    /// See [`MessageCrypt::encrypt`].
    pub fn encrypt_message_at<C: Clock + ?Sized>(&self, reply: &str, clock: &C) -> Result<String> {
        let timestamp = unix_timestamp(clock).to_string();
        let nonce = nonce(REPLY_NONCE_LEN, NonceCharset::default());
        self.encrypt_message(reply, &timestamp, &nonce)
    }

    /// Verify and decrypt an inbound callback body.
    ///
    /// # Errors
    /// - `WxError::CiphertextExtraction` if the body has no `<Encrypt>` element
    /// - `WxError::SignatureMismatch` if `msg_signature` does not match
    /// - `WxError::Decryption` or `WxError::IdentityMismatch` from `decrypt`
    #[instrument(skip(self, msg_signature, post_data))]
    pub fn decrypt_message(
        &self,
        msg_signature: &str,
        timestamp: &str,
        nonce: &str,
        post_data: &str,
    ) -> Result<String> {
        let ciphertext = extract_ciphertext(post_data);
        if ciphertext.is_empty() {
            return Err(WxError::CiphertextExtraction);
        }
        self.verify_signature(msg_signature, timestamp, nonce, ciphertext)?;
        self.decrypt(ciphertext)
    }
}
