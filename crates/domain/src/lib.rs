//! # WxKit Domain
//!
//! Domain types for the platform message security layer.
//!
//! This crate contains:
//! - The error taxonomy (`WxError`) and `Result` alias
//! - Credential types and their persisted JSON layout
//! - Signing algorithm selectors and signed parameter bundles
//! - Configuration structures
//! - Protocol constants
//!
//! ## Architecture
//! - Depends only on the foundation tier of `wxkit-common`
//! - No I/O, no async

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
