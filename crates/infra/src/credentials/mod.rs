//! Adapters for the credential cache ports

pub mod file_store;
pub mod issuer;

pub use file_store::JsonFileCredentialStore;
pub use issuer::PlatformCredentialIssuer;
