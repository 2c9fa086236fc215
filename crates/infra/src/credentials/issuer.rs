//! Platform token endpoints
//!
//! Implements [`CredentialIssuer`] against the platform's HTTP API:
//! - access token: `GET /cgi-bin/token?grant_type=client_credential&appid&secret`
//! - JS-API ticket: `GET /cgi-bin/ticket/getticket?type=jsapi&access_token`

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use wxkit_core::CredentialIssuer;
use wxkit_domain::{AppConfig, CredentialGrant, CredentialKind, Result, WxError};

use crate::http::HttpClient;

const TOKEN_PATH: &str = "/cgi-bin/token";
const TICKET_PATH: &str = "/cgi-bin/ticket/getticket";

/// Issues credentials by calling the platform API.
#[derive(Clone)]
pub struct PlatformCredentialIssuer {
    http: HttpClient,
    base_url: String,
    app_id: String,
    app_secret: String,
}

impl PlatformCredentialIssuer {
    /// Issuer calling `base_url`. A trailing slash is trimmed.
    pub fn new(
        http: HttpClient,
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, app_id: app_id.into(), app_secret: app_secret.into() }
    }

    /// Issuer for the configured app, with the configured timeout.
    ///
    /// # Errors
    /// Returns `WxError::Network` if the HTTP client cannot be built.
    pub fn from_config(app: &AppConfig) -> Result<Self> {
        let http = HttpClient::from_config(app)?;
        Ok(Self::new(http, &app.base_url, &app.app_id, &app.app_secret))
    }

    async fn fetch(&self, kind: CredentialKind, bearer: Option<&str>) -> Result<Value> {
        match kind {
            CredentialKind::AccessToken => {
                let url = format!("{}{TOKEN_PATH}", self.base_url);
                let query = [
                    ("grant_type", "client_credential"),
                    ("appid", self.app_id.as_str()),
                    ("secret", self.app_secret.as_str()),
                ];
                self.http.get_json(&url, &query).await
            }
            CredentialKind::JsApiTicket => {
                let access_token = bearer.ok_or_else(|| {
                    WxError::credential(kind, "an access token is required", false)
                })?;
                let url = format!("{}{TICKET_PATH}", self.base_url);
                let query = [("type", "jsapi"), ("access_token", access_token)];
                self.http.get_json(&url, &query).await
            }
        }
    }
}

#[async_trait]
impl CredentialIssuer for PlatformCredentialIssuer {
    async fn issue(&self, kind: CredentialKind, bearer: Option<&str>) -> Result<CredentialGrant> {
        debug!(app_id = %self.app_id, %kind, "Requesting credential from platform");
        let body = self.fetch(kind, bearer).await.map_err(|err| err.into_acquisition(kind))?;

        if let Some(code) = body.get("errcode").and_then(Value::as_i64).filter(|code| *code != 0) {
            let message = body.get("errmsg").and_then(Value::as_str).unwrap_or("unknown error");
            warn!(
                app_id = %self.app_id,
                %kind,
                errcode = code,
                errmsg = message,
                "Platform refused credential"
            );
            return Err(WxError::credential(kind, format!("errcode {code}: {message}"), false));
        }

        CredentialGrant::from_response(kind, &body).map_err(|err| err.into_acquisition(kind))
    }
}

impl fmt::Debug for PlatformCredentialIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformCredentialIssuer")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
