//! Logging setup
//!
//! Installs a `tracing-subscriber` fmt subscriber filtered by an
//! [`EnvFilter`]. `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use wxkit_domain::{LoggingConfig, Result, WxError};

/// Install the global subscriber.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case nothing changes.
///
/// # Errors
/// Returns `WxError::Config` if the configured level is not a valid filter
/// directive.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_target(true)).try_init().is_ok()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "Tracing initialized");
    }
    Ok(installed)
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.level)
            .map_err(|e| WxError::Config(format!("Invalid log level '{}': {e}", config.level)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = LoggingConfig::default();
        init_tracing(&config).unwrap();
        assert!(!init_tracing(&config).unwrap());
    }

    #[test]
    fn rejects_malformed_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig { level: "wxkit=loud".into(), json: false };
        assert!(matches!(env_filter(&config), Err(WxError::Config(_))));
    }
}
