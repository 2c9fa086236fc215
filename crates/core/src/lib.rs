//! # WxKit Core
//!
//! The message security layer: pure crypto, signing and credential caching.
//!
//! This crate contains:
//! - Callback message encryption and the verify-then-decrypt facade
//! - The closed set of signing strategies and their helpers
//! - The per-tenant credential cache
//! - Port interfaces (traits) for credential issuance and persistence
//!
//! ## Architecture Principles
//! - Depends only on `wxkit-common` and `wxkit-domain`
//! - No HTTP or filesystem code
//! - All external dependencies via traits

pub mod credentials;
pub mod crypto;
pub mod signing;

// Re-export specific items to avoid ambiguity
pub use credentials::{CredentialCache, CredentialIssuer, CredentialStore};
pub use crypto::{CryptoContext, MessageCrypt};
pub use signing::{
    default_nonce, message_signature, nonce, web_sdk_config, MerchantSigner, NonceCharset,
    SignParams, SignStrategy, WebSdkConfigurer,
};
