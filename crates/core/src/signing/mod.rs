//! Signatures, nonces and signed parameter bundles

mod digest;
pub mod nonce;
pub mod params;
pub mod payment;
pub mod strategy;
pub mod web;

pub(crate) use digest::constant_time_eq;
pub use nonce::{default_nonce, nonce, NonceCharset};
pub use params::SignParams;
pub use payment::MerchantSigner;
pub use strategy::{message_signature, SignStrategy};
pub use web::{web_sdk_config, WebSdkConfigurer};
