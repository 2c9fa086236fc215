//! # WxKit Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (environment, `.env`, TOML/JSON files)
//! - Logging setup
//! - The retrying HTTP client
//! - Platform credential issuer and JSON file credential store
//! - The composition root
//!
//! ## Architecture
//! - Implements traits defined in `wxkit-core`
//! - Contains all "impure" code (HTTP, filesystem, environment)

pub mod bootstrap;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use bootstrap::Services;
pub use credentials::{JsonFileCredentialStore, PlatformCredentialIssuer};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
