//! Port interfaces for credential acquisition and persistence
//!
//! These traits define the boundaries between the cache and the
//! infrastructure that talks to the platform or the filesystem.

use async_trait::async_trait;
use wxkit_domain::{Credential, CredentialGrant, CredentialKind, Result};

/// Obtains fresh credentials from the platform.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Request a new credential of `kind`.
    ///
    /// `bearer` carries the value of `kind.bearer_kind()` when that kind
    /// needs one (a JS-API ticket is issued against an access token).
    async fn issue(&self, kind: CredentialKind, bearer: Option<&str>) -> Result<CredentialGrant>;
}

/// Durable storage for credentials across process restarts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the last saved credential, `None` if nothing was saved.
    async fn load(&self, tenant: &str, kind: CredentialKind) -> Result<Option<Credential>>;

    /// Save `credential`, replacing any previous one of the same kind.
    async fn save(&self, tenant: &str, credential: &Credential) -> Result<()>;
}
