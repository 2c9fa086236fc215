//! Per-tenant credential cache
//!
//! Holds one slot per [`CredentialKind`]. Reads of a fresh slot never touch
//! I/O. Refreshes are single-flight per kind: callers that queue behind an
//! in-flight refresh re-check the slot and reuse what it stored.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};
use wxkit_common::{Clock, SystemClock};
use wxkit_domain::{Credential, CredentialKind, Result};

use super::ports::{CredentialIssuer, CredentialStore};

/// Cache of bearer credentials for one tenant (app id).
pub struct CredentialCache<C: Clock = SystemClock> {
    tenant: String,
    issuer: Arc<dyn CredentialIssuer>,
    store: Option<Arc<dyn CredentialStore>>,
    slots: RwLock<HashMap<CredentialKind, Credential>>,
    gates: [AsyncMutex<()>; CredentialKind::ALL.len()],
    clock: C,
}

impl CredentialCache<SystemClock> {
    /// Create a cache backed by the system clock.
    pub fn new(tenant: impl Into<String>, issuer: Arc<dyn CredentialIssuer>) -> Self {
        Self::with_clock(tenant, issuer, SystemClock)
    }
}

impl<C: Clock> CredentialCache<C> {
    /// Create a cache reading time from `clock`.
    pub fn with_clock(
        tenant: impl Into<String>,
        issuer: Arc<dyn CredentialIssuer>,
        clock: C,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            issuer,
            store: None,
            slots: RwLock::new(HashMap::new()),
            gates: [AsyncMutex::new(()), AsyncMutex::new(())],
            clock,
        }
    }

    /// Persist refreshed credentials to `store`.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// App id credentials are stored under.
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Clock used for expiry checks and stamping.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Prime the slots from the store.
    ///
    /// Unreadable entries are logged and skipped. Returns how many
    /// credentials were loaded.
    pub async fn initialize(&self) -> usize {
        let Some(store) = &self.store else {
            return 0;
        };

        let mut loaded = 0;
        for kind in CredentialKind::ALL {
            match store.load(&self.tenant, kind).await {
                Ok(Some(credential)) => {
                    self.slots.write().insert(kind, credential);
                    loaded += 1;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        tenant = %self.tenant,
                        %kind,
                        error = %err,
                        "Skipping unreadable persisted credential"
                    );
                }
            }
        }
        debug!(tenant = %self.tenant, loaded, "Credential cache initialized");
        loaded
    }

    /// The cached credential if it is still usable, without any I/O.
    pub fn peek(&self, kind: CredentialKind) -> Option<Credential> {
        let now_ms = self.clock.millis_since_epoch();
        self.slots.read().get(&kind).filter(|credential| credential.is_usable_at(now_ms)).cloned()
    }

    /// Place `credential` in its slot, replacing whatever was there.
    pub fn insert(&self, credential: Credential) {
        self.slots.write().insert(credential.kind, credential);
    }

    /// Drop the slot for `kind` so the next [`Self::get`] refreshes.
    pub fn invalidate(&self, kind: CredentialKind) -> Option<Credential> {
        self.slots.write().remove(&kind)
    }

    /// A usable credential of `kind`, refreshing through the issuer if
    /// needed.
    ///
    /// # Errors
    /// Returns `WxError::CredentialAcquisition` when the issuer (or the
    /// issuer of the bearer credential) fails. Nothing is cached then.
    pub async fn get(&self, kind: CredentialKind) -> Result<Credential> {
        if let Some(credential) = self.peek(kind) {
            return Ok(credential);
        }

        let bearer = match kind.bearer_kind() {
            Some(bearer_kind) => Some(self.acquire(bearer_kind, None).await?.value),
            None => None,
        };
        self.acquire(kind, bearer.as_deref()).await
    }

    async fn acquire(&self, kind: CredentialKind, bearer: Option<&str>) -> Result<Credential> {
        if let Some(credential) = self.peek(kind) {
            return Ok(credential);
        }

        let _gate = self.gate(kind).lock().await;
        if let Some(credential) = self.peek(kind) {
            debug!(tenant = %self.tenant, %kind, "Reusing credential refreshed concurrently");
            return Ok(credential);
        }

        debug!(tenant = %self.tenant, %kind, "Refreshing credential");
        let grant = self.issuer.issue(kind, bearer).await.map_err(|err| {
            let err = err.into_acquisition(kind);
            warn!(tenant = %self.tenant, %kind, error = %err, "Credential refresh failed");
            err
        })?;

        let credential = Credential::from_grant(kind, grant, self.clock.millis_since_epoch());
        self.slots.write().insert(kind, credential.clone());
        info!(
            tenant = %self.tenant,
            %kind,
            ttl_seconds = credential.ttl_seconds,
            "Credential refreshed"
        );

        self.persist(&credential).await;
        Ok(credential)
    }

    async fn persist(&self, credential: &Credential) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save(&self.tenant, credential).await {
            warn!(
                tenant = %self.tenant,
                kind = %credential.kind,
                error = %err,
                "Failed to persist refreshed credential"
            );
        }
    }

    fn gate(&self, kind: CredentialKind) -> &AsyncMutex<()> {
        match kind {
            CredentialKind::AccessToken => &self.gates[0],
            CredentialKind::JsApiTicket => &self.gates[1],
        }
    }
}
