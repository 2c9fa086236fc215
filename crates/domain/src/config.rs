//! Configuration structures
//!
//! Loaded by `wxkit_infra::config` from the environment or a TOML/JSON file.
//! Optional sections enable the matching feature: without `message` there is
//! no callback crypto, without `pay` no payment signing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CACHE_DIR, DEFAULT_LOG_LEVEL, DEFAULT_TIMEOUT_SECS,
};
use crate::types::SignAlgorithm;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// App identity, always required.
    pub app: AppConfig,
    /// Enables callback message crypto.
    #[serde(default)]
    pub message: Option<MessageConfig>,
    /// Enables merchant payment signing.
    #[serde(default)]
    pub pay: Option<PayConfig>,
    /// Enables virtual payment request signing.
    #[serde(default)]
    pub midas: Option<MidasConfig>,
    /// Credential persistence.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Log filter and format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application identity and API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Public app id, also the message frame identity.
    pub app_id: String,
    /// Secret used to request access tokens.
    pub app_secret: String,
    /// API root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AppConfig {
    /// App credentials with the default endpoint and timeout.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Callback message crypto settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Shared token for callback signatures.
    pub token: String,
    /// 43-character base64 key from the platform console.
    pub encoding_aes_key: String,
}

/// Merchant payment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayConfig {
    /// Merchant number.
    pub mch_id: String,
    /// Merchant API key used to sign payment parameters.
    pub mch_key: String,
    /// Default algorithm. `MD5` when omitted.
    #[serde(default)]
    pub sign_type: SignAlgorithm,
}

/// Virtual payment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidasConfig {
    /// App key for the virtual payment API.
    pub secret: String,
}

/// Where persisted credentials live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one JSON file per app and credential kind.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { dir: default_cache_dir() }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[app]
app_id = "wx5823bf96d3bd56c7"
app_secret = "secret"
"#,
        )
        .unwrap();

        assert_eq!(config.app.base_url, "https://api.weixin.qq.com");
        assert_eq!(config.app.timeout_secs, 40);
        assert!(config.message.is_none());
        assert!(config.pay.is_none());
        assert_eq!(config.cache.dir, PathBuf::from(".wxkit"));
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn pay_section_parses_sign_type() {
        let config: Config = serde_json::from_str(
            r#"{
                "app": {"app_id": "wx1", "app_secret": "s"},
                "pay": {"mch_id": "10000100", "mch_key": "k", "sign_type": "HMAC-SHA256"}
            }"#,
        )
        .unwrap();

        let pay = config.pay.unwrap();
        assert_eq!(pay.sign_type, SignAlgorithm::HmacSha256);
    }
}
