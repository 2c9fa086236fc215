//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment if one exists
//! 2. Attempts to load from environment variables
//! 3. If required variables are missing, falls back to loading from file
//! 4. Searches several paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `WXKIT_APP_ID`, `WXKIT_APP_SECRET`: app credentials (required)
//! - `WXKIT_BASE_URL`: API base URL
//! - `WXKIT_TIMEOUT_SECS`: request timeout in seconds
//! - `WXKIT_TOKEN`, `WXKIT_ENCODING_AES_KEY`: callback crypto (set both or
//!   neither)
//! - `WXKIT_MCH_ID`, `WXKIT_MCH_KEY`, `WXKIT_SIGN_TYPE`: merchant payment
//! - `WXKIT_MIDAS_SECRET`: virtual payment secret
//! - `WXKIT_CACHE_DIR`: credential cache directory
//! - `WXKIT_LOG_LEVEL`, `WXKIT_LOG_JSON`: logging
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./wxkit.toml` or `./wxkit.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names in the parent directory
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use wxkit_domain::constants::ENCODING_AES_KEY_LEN;
use wxkit_domain::{
    AppConfig, CacheConfig, Config, LoggingConfig, MessageConfig, MidasConfig, PayConfig, Result,
    SignAlgorithm, WxError,
};

/// Variables whose presence selects the environment as the config source.
const REQUIRED_ENV_VARS: [&str; 2] = ["WXKIT_APP_ID", "WXKIT_APP_SECRET"];

const CONFIG_FILE_NAMES: [&str; 4] = ["wxkit.toml", "wxkit.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// Reads `.env` first, then the environment. Only when `WXKIT_APP_ID` or
/// `WXKIT_APP_SECRET` is absent does it fall back to a config file; an
/// environment that names an app but carries invalid values is an error.
///
/// # Errors
/// Returns `WxError::Config` if:
/// - An environment variable is present but invalid, or a paired variable
///   is set without its partner
/// - No environment app credentials and no usable config file
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    if REQUIRED_ENV_VARS.iter().any(|key| env_opt(key).is_none()) {
        tracing::debug!("App credentials not in environment, trying config file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from `WXKIT_*` environment variables
///
/// # Errors
/// Returns `WxError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let [app_id, app_secret] = REQUIRED_ENV_VARS;
    let mut app = AppConfig::new(env_var(app_id)?, env_var(app_secret)?);
    if let Some(base_url) = env_opt("WXKIT_BASE_URL") {
        app.base_url = base_url;
    }
    if let Some(timeout) = env_opt("WXKIT_TIMEOUT_SECS") {
        app.timeout_secs = timeout
            .parse::<u64>()
            .map_err(|e| WxError::Config(format!("Invalid WXKIT_TIMEOUT_SECS: {e}")))?;
    }

    let message = match (env_opt("WXKIT_TOKEN"), env_opt("WXKIT_ENCODING_AES_KEY")) {
        (Some(token), Some(encoding_aes_key)) => Some(MessageConfig { token, encoding_aes_key }),
        (None, None) => None,
        _ => {
            return Err(WxError::Config(
                "WXKIT_TOKEN and WXKIT_ENCODING_AES_KEY must be set together".to_string(),
            ))
        }
    };

    let pay = match (env_opt("WXKIT_MCH_ID"), env_opt("WXKIT_MCH_KEY")) {
        (Some(mch_id), Some(mch_key)) => {
            let sign_type = match env_opt("WXKIT_SIGN_TYPE") {
                Some(name) => name
                    .parse::<SignAlgorithm>()
                    .map_err(|e| WxError::Config(format!("Invalid WXKIT_SIGN_TYPE: {e}")))?,
                None => SignAlgorithm::default(),
            };
            Some(PayConfig { mch_id, mch_key, sign_type })
        }
        (None, None) => None,
        _ => {
            return Err(WxError::Config(
                "WXKIT_MCH_ID and WXKIT_MCH_KEY must be set together".to_string(),
            ))
        }
    };

    let midas = env_opt("WXKIT_MIDAS_SECRET").map(|secret| MidasConfig { secret });

    let mut cache = CacheConfig::default();
    if let Some(dir) = env_opt("WXKIT_CACHE_DIR") {
        cache.dir = PathBuf::from(dir);
    }

    let mut logging = LoggingConfig::default();
    if let Some(level) = env_opt("WXKIT_LOG_LEVEL") {
        logging.level = level;
    }
    logging.json = env_bool("WXKIT_LOG_JSON", false);

    let config = Config { app, message, pay, midas, cache, logging };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches several locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `WxError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WxError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            WxError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WxError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => {
            toml::from_str(contents).map_err(|e| WxError::Config(format!("Invalid TOML format: {e}")))
        }
        "json" => serde_json::from_str(contents)
            .map_err(|e| WxError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WxError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Reject configurations that would fail later in a less obvious place.
fn validate(config: &Config) -> Result<()> {
    if config.app.app_id.trim().is_empty() {
        return Err(WxError::Config("app_id must not be empty".to_string()));
    }
    if config.app.timeout_secs == 0 {
        return Err(WxError::Config("timeout_secs must be positive".to_string()));
    }
    if let Some(message) = &config.message {
        if message.encoding_aes_key.len() != ENCODING_AES_KEY_LEN {
            return Err(WxError::Config(format!(
                "encoding_aes_key must be {ENCODING_AES_KEY_LEN} characters, got {}",
                message.encoding_aes_key.len()
            )));
        }
    }
    Ok(())
}

/// Search several paths for a configuration file
///
/// Searches the current working directory and its parent, then the
/// executable's directory and its parent.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
            roots.push(exe_dir.join(".."));
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `WxError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| WxError::Config(format!("Missing required environment variable: {key}")))
}

/// Optional environment variable; empty counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
