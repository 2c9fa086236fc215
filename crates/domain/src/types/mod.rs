//! Domain data types

pub mod credential;
pub mod signing;

pub use credential::{Credential, CredentialGrant, CredentialKind};
pub use signing::{AppPayParams, PayParams, SignAlgorithm, WebSdkConfig};
