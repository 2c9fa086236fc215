//! Composition root
//!
//! Wires the core services to their infrastructure adapters from a loaded
//! [`Config`]. The credential cache is created once here and shared by
//! handle.

use std::sync::Arc;

use wxkit_core::{
    CredentialCache, MerchantSigner, MessageCrypt, SignStrategy, WebSdkConfigurer,
};
use wxkit_domain::{Config, Result};

use crate::credentials::{JsonFileCredentialStore, PlatformCredentialIssuer};

/// Everything an application needs, built from one configuration.
pub struct Services {
    /// Access tokens and tickets for the configured app.
    pub cache: Arc<CredentialCache>,
    /// Signs web SDK configurations with tickets from `cache`.
    pub web: WebSdkConfigurer,
    /// Present when the `message` section is configured.
    pub crypt: Option<MessageCrypt>,
    /// Present when the `pay` section is configured.
    pub merchant: Option<MerchantSigner>,
    midas_secret: Option<String>,
}

impl Services {
    /// Build the services and restore persisted credentials.
    ///
    /// # Errors
    /// Returns `WxError::Config` for a malformed encoding key and any error
    /// from building the HTTP client.
    pub async fn build(config: &Config) -> Result<Self> {
        let issuer = Arc::new(PlatformCredentialIssuer::from_config(&config.app)?);
        let store = Arc::new(JsonFileCredentialStore::from_config(&config.cache));
        let cache = Arc::new(CredentialCache::new(&config.app.app_id, issuer).with_store(store));
        cache.initialize().await;

        let crypt = config
            .message
            .as_ref()
            .map(|message| MessageCrypt::from_config(&config.app, message))
            .transpose()?;
        let merchant = config.pay.as_ref().map(|pay| MerchantSigner::from_config(&config.app, pay));

        tracing::info!(
            app_id = %config.app.app_id,
            message_crypt = crypt.is_some(),
            merchant = merchant.is_some(),
            "Services initialized"
        );

        Ok(Self {
            web: WebSdkConfigurer::new(Arc::clone(&cache), &config.app.app_id),
            cache,
            crypt,
            merchant,
            midas_secret: config.midas.as_ref().map(|midas| midas.secret.clone()),
        })
    }

    /// `sig` strategy for the virtual-payment endpoint at `uri`.
    pub fn midas(&self, uri: &str) -> Option<SignStrategy> {
        self.midas_secret
            .as_ref()
            .map(|secret| SignStrategy::Midas { uri: uri.to_string(), secret: secret.clone() })
    }
}
