//! Integration tests for the credential cache against mock ports.

mod support;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use support::credentials::{InMemoryStore, ScriptedIssuer};
use wxkit_common::testing::MockClock;
use wxkit_core::CredentialCache;
use wxkit_domain::{Credential, CredentialKind, WxError};

const TENANT: &str = "wx5823bf96d3bd56c7";
const NOW_MS: u64 = 1_409_659_813_000;

fn cache_with(
    issuer: &Arc<ScriptedIssuer>,
    store: &Arc<InMemoryStore>,
) -> (Arc<CredentialCache<MockClock>>, MockClock) {
    let clock = MockClock::at_millis(NOW_MS);
    let cache = CredentialCache::with_clock(TENANT, issuer.clone(), clock.clone())
        .with_store(store.clone());
    (Arc::new(cache), clock)
}

#[tokio::test]
async fn concurrent_callers_share_one_refresh() {
    let issuer = Arc::new(ScriptedIssuer::with_latency(Duration::from_millis(50)));
    let store = Arc::new(InMemoryStore::new());
    let (cache, _clock) = cache_with(&issuer, &store);

    let callers = (0..16).map(|_| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.get(CredentialKind::AccessToken).await })
    });
    let results = join_all(callers).await;

    for result in results {
        let credential = result.expect("task panicked").expect("refresh failed");
        assert_eq!(credential.value, "access_token-1");
    }
    assert_eq!(issuer.calls(CredentialKind::AccessToken), 1);
    assert_eq!(store.saves(), 1);
}

#[tokio::test]
async fn ticket_refresh_presents_cached_access_token() {
    let issuer = Arc::new(ScriptedIssuer::new());
    let store = Arc::new(InMemoryStore::new());
    let (cache, _clock) = cache_with(&issuer, &store);

    let token = cache.get(CredentialKind::AccessToken).await.unwrap();
    let ticket = cache.get(CredentialKind::JsApiTicket).await.unwrap();

    assert_eq!(ticket.value, "jsapi_ticket-1");
    assert_eq!(issuer.calls(CredentialKind::AccessToken), 1);
    assert_eq!(issuer.bearers(), vec![None, Some(token.value)]);
}

#[tokio::test]
async fn stale_credential_is_refreshed_and_persisted() {
    let issuer = Arc::new(ScriptedIssuer::new());
    let store = Arc::new(InMemoryStore::new());
    let (cache, clock) = cache_with(&issuer, &store);

    cache.get(CredentialKind::AccessToken).await.unwrap();
    clock.advance(Duration::from_millis(7_196_000));
    let refreshed = cache.get(CredentialKind::AccessToken).await.unwrap();

    assert_eq!(refreshed.value, "access_token-2");
    assert_eq!(refreshed.issued_at_ms, NOW_MS + 7_196_000);

    let saved = store.saved(TENANT, CredentialKind::AccessToken).unwrap();
    assert_eq!(saved, refreshed);
}

#[tokio::test]
async fn failed_refresh_surfaces_error_and_caches_nothing() {
    let issuer = Arc::new(ScriptedIssuer::new());
    let store = Arc::new(InMemoryStore::new());
    let (cache, _clock) = cache_with(&issuer, &store);

    issuer.set_failing(true);
    let err = cache.get(CredentialKind::AccessToken).await.unwrap_err();
    assert!(matches!(
        err,
        WxError::CredentialAcquisition { kind: CredentialKind::AccessToken, retryable: false, .. }
    ));
    assert!(cache.peek(CredentialKind::AccessToken).is_none());
    assert_eq!(store.saves(), 0);

    issuer.set_failing(false);
    assert_eq!(cache.get(CredentialKind::AccessToken).await.unwrap().value, "access_token-1");
}

#[tokio::test]
async fn failed_token_refresh_fails_ticket_request() {
    let issuer = Arc::new(ScriptedIssuer::new());
    let store = Arc::new(InMemoryStore::new());
    let (cache, _clock) = cache_with(&issuer, &store);

    issuer.set_failing(true);
    let err = cache.get(CredentialKind::JsApiTicket).await.unwrap_err();
    assert!(matches!(
        err,
        WxError::CredentialAcquisition { kind: CredentialKind::AccessToken, .. }
    ));
    assert_eq!(issuer.calls(CredentialKind::JsApiTicket), 0);
}

#[tokio::test]
async fn persistence_failure_does_not_fail_get() {
    let issuer = Arc::new(ScriptedIssuer::new());
    let store = Arc::new(InMemoryStore::new());
    let (cache, _clock) = cache_with(&issuer, &store);

    store.set_failing(true);
    let credential = cache.get(CredentialKind::AccessToken).await.unwrap();
    assert_eq!(credential.value, "access_token-1");
    assert!(cache.peek(CredentialKind::AccessToken).is_some());
}

#[tokio::test]
async fn initialize_restores_persisted_credentials() {
    let issuer = Arc::new(ScriptedIssuer::new());
    let store = Arc::new(InMemoryStore::new());
    let token = Credential::new(CredentialKind::AccessToken, "persisted", NOW_MS - 7_000_000, 7200);
    let ticket = Credential::new(CredentialKind::JsApiTicket, "expired", NOW_MS - 7_196_000, 7200);
    let foreign = Credential::new(CredentialKind::AccessToken, "foreign", NOW_MS, 7200);
    store.seed(TENANT, token);
    store.seed(TENANT, ticket);
    store.seed("another-tenant", foreign);
    let (cache, _clock) = cache_with(&issuer, &store);

    assert_eq!(cache.initialize().await, 2);

    let token = cache.get(CredentialKind::AccessToken).await.unwrap();
    assert_eq!(token.value, "persisted");
    assert_eq!(issuer.calls(CredentialKind::AccessToken), 0);

    assert!(cache.peek(CredentialKind::JsApiTicket).is_none());
    let ticket = cache.get(CredentialKind::JsApiTicket).await.unwrap();
    assert_eq!(ticket.value, "jsapi_ticket-1");
    assert_eq!(issuer.bearers(), vec![Some("persisted".to_string())]);
}

#[tokio::test]
async fn initialize_skips_unreadable_store() {
    let issuer = Arc::new(ScriptedIssuer::new());
    let store = Arc::new(InMemoryStore::new());
    store.set_failing(true);
    let (cache, _clock) = cache_with(&issuer, &store);

    assert_eq!(cache.initialize().await, 0);
}
