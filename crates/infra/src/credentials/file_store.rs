//! JSON file persistence for credentials
//!
//! One file per tenant and kind, `<dir>/<tenant>_<kind>.json`, holding the
//! persisted credential object (`{<field>, expire_in, _time, ...}`).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use wxkit_core::CredentialStore;
use wxkit_domain::{CacheConfig, Credential, CredentialKind, Result, WxError};

use crate::errors::InfraError;

/// Stores credentials as JSON files under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileCredentialStore {
    dir: PathBuf,
}

impl JsonFileCredentialStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the configured cache directory.
    pub fn from_config(cache: &CacheConfig) -> Self {
        Self::new(&cache.dir)
    }

    /// Directory credentials are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `tenant`'s credential of `kind`.
    ///
    /// # Errors
    /// Returns `WxError::InvalidInput` if `tenant` could escape the directory.
    pub fn path_for(&self, tenant: &str, kind: CredentialKind) -> Result<PathBuf> {
        let escapes = tenant.contains(|c: char| c == '/' || c == '\\') || tenant.starts_with('.');
        if tenant.is_empty() || escapes {
            return Err(WxError::InvalidInput(format!("unsafe tenant name: {tenant:?}")));
        }
        Ok(self.dir.join(format!("{tenant}_{kind}.json")))
    }
}

#[async_trait]
impl CredentialStore for JsonFileCredentialStore {
    async fn load(&self, tenant: &str, kind: CredentialKind) -> Result<Option<Credential>> {
        let path = self.path_for(tenant, kind)?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        let document: Value = serde_json::from_str(&contents)?;
        let credential = Credential::from_persisted(kind, &document)?;
        debug!(path = %path.display(), %kind, "Loaded persisted credential");
        Ok(Some(credential))
    }

    async fn save(&self, tenant: &str, credential: &Credential) -> Result<()> {
        let path = self.path_for(tenant, credential.kind)?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(InfraError::from)?;

        let bytes = serde_json::to_vec(&credential.to_persisted())?;
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes).await.map_err(InfraError::from)?;
        tokio::fs::rename(&staging, &path).await.map_err(InfraError::from)?;

        debug!(path = %path.display(), kind = %credential.kind, "Persisted credential");
        Ok(())
    }
}
