//! Credential cache and its ports

pub mod cache;
pub mod ports;

pub use cache::CredentialCache;
pub use ports::{CredentialIssuer, CredentialStore};
