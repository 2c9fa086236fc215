//! Mock credential issuer and store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use wxkit_core::credentials::{CredentialIssuer, CredentialStore};
use wxkit_domain::{Credential, CredentialGrant, CredentialKind, Result, WxError};

/// Issuer that hands out numbered values and records every call.
///
/// Values look like `<kind>-<n>` where `n` counts calls for that kind.
#[derive(Default)]
pub struct ScriptedIssuer {
    access_token_calls: AtomicUsize,
    ticket_calls: AtomicUsize,
    failing: AtomicBool,
    latency: Option<Duration>,
    bearers: Mutex<Vec<Option<String>>>,
}

impl ScriptedIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold each issuance for `latency` so concurrent callers overlap.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency: Some(latency), ..Self::default() }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self, kind: CredentialKind) -> usize {
        match kind {
            CredentialKind::AccessToken => self.access_token_calls.load(Ordering::SeqCst),
            CredentialKind::JsApiTicket => self.ticket_calls.load(Ordering::SeqCst),
        }
    }

    /// Bearers presented to the issuer, in call order.
    pub fn bearers(&self) -> Vec<Option<String>> {
        self.bearers.lock().clone()
    }
}

#[async_trait]
impl CredentialIssuer for ScriptedIssuer {
    async fn issue(&self, kind: CredentialKind, bearer: Option<&str>) -> Result<CredentialGrant> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.bearers.lock().push(bearer.map(str::to_string));

        if self.failing.load(Ordering::SeqCst) {
            return Err(WxError::credential(kind, "errcode 40013: invalid appid", false));
        }

        let counter = match kind {
            CredentialKind::AccessToken => &self.access_token_calls,
            CredentialKind::JsApiTicket => &self.ticket_calls,
        };
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CredentialGrant::new(format!("{kind}-{n}")).with_ttl(7200))
    }
}

/// Store keeping credentials in memory, keyed by tenant and kind.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<(String, CredentialKind), Credential>>,
    saves: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, tenant: &str, credential: Credential) {
        self.entries.lock().insert((tenant.to_string(), credential.kind), credential);
    }

    pub fn saved(&self, tenant: &str, kind: CredentialKind) -> Option<Credential> {
        self.entries.lock().get(&(tenant.to_string(), kind)).cloned()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn load(&self, tenant: &str, kind: CredentialKind) -> Result<Option<Credential>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(WxError::Storage("disk unavailable".into()));
        }
        Ok(self.saved(tenant, kind))
    }

    async fn save(&self, tenant: &str, credential: &Credential) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(WxError::Storage("disk unavailable".into()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.seed(tenant, credential.clone());
        Ok(())
    }
}
