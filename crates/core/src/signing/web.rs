//! Web SDK configuration signing

use std::sync::Arc;

use wxkit_common::{unix_timestamp, Clock, SystemClock};
use wxkit_domain::{CredentialKind, Result, WebSdkConfig};

use super::nonce::default_nonce;
use super::params::SignParams;
use super::strategy::SignStrategy;
use crate::credentials::CredentialCache;

/// Sign a web SDK configuration for the page at `url`.
///
/// `url` must be the full page URL without its fragment, exactly as the
/// browser reports it.
///
/// # Errors
/// Infallible in practice. SHA-1 signing shares the fallible signing path.
pub fn web_sdk_config(
    app_id: &str,
    ticket: &str,
    url: &str,
    timestamp: u64,
    nonce: &str,
) -> Result<WebSdkConfig> {
    let params = SignParams::new()
        .with("jsapi_ticket", ticket)
        .with("url", url)
        .with("timestamp", timestamp)
        .with("noncestr", nonce);
    let signature = SignStrategy::WebTicket.sign(&params)?;

    Ok(WebSdkConfig {
        app_id: app_id.to_string(),
        timestamp,
        nonce_str: nonce.to_string(),
        signature,
        js_api_list: Vec::new(),
        debug: false,
    })
}

/// Produces signed web SDK configurations using tickets from the cache.
pub struct WebSdkConfigurer<C: Clock = SystemClock> {
    cache: Arc<CredentialCache<C>>,
    app_id: String,
}

impl<C: Clock> WebSdkConfigurer<C> {
    /// Configurer drawing tickets from `cache` for `app_id`.
    pub fn new(cache: Arc<CredentialCache<C>>, app_id: impl Into<String>) -> Self {
        Self { cache, app_id: app_id.into() }
    }

    /// Configuration for `url`, enabling `js_api_list`.
    ///
    /// # Errors
    /// Returns `WxError::CredentialAcquisition` if no JS-API ticket can be
    /// obtained.
    pub async fn config_for(
        &self,
        url: &str,
        js_api_list: Vec<String>,
        debug: bool,
    ) -> Result<WebSdkConfig> {
        let ticket = self.cache.get(CredentialKind::JsApiTicket).await?;
        let timestamp = unix_timestamp(self.cache.clock());
        let config = web_sdk_config(&self.app_id, &ticket.value, url, timestamp, &default_nonce())?;
        Ok(WebSdkConfig { js_api_list, debug, ..config })
    }
}
