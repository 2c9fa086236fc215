//! Retrying HTTP client for platform API calls
//!
//! Platform credential endpoints are plain `GET` requests answering JSON.
//! Server errors and connection failures are retried with exponential
//! backoff; every other response is handed back on the first attempt.

use std::time::Duration;

use reqwest::{Client as ReqwestClient, Response, StatusCode};
use serde_json::Value;
use tracing::debug;
use wxkit_domain::constants::DEFAULT_TIMEOUT_SECS;
use wxkit_domain::{AppConfig, Result, WxError};

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("wxkit/", env!("CARGO_PKG_VERSION"));

/// Backoff schedule: `base`, `2 * base`, `4 * base`, ... capped at 256x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: usize,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `attempts` is clamped to at least 1.
    pub fn new(attempts: usize, base_delay: Duration) -> Self {
        Self { attempts: attempts.max(1), base_delay }
    }

    /// Total attempts, including the first.
    pub const fn attempts(&self) -> usize {
        self.attempts
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_before(&self, retry: usize) -> Duration {
        let exponent = u32::try_from(retry.saturating_sub(1).min(8)).unwrap_or(8);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    const fn has_retry_after(&self, attempt: usize) -> bool {
        attempt < self.attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

/// Shared reqwest client plus the retry schedule applied to every call.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Start from the default timeout, retry schedule and user agent.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with the default timeout and retry schedule.
    ///
    /// # Errors
    /// Returns `WxError::Network` if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Client using the configured request timeout.
    ///
    /// # Errors
    /// See [`HttpClient::new`].
    pub fn from_config(app: &AppConfig) -> Result<Self> {
        Self::builder().timeout(Duration::from_secs(app.timeout_secs)).build()
    }

    /// Retry schedule applied to every call.
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// `GET url?query` and decode the body as JSON.
    ///
    /// # Errors
    /// - `WxError::Network` for transport failures and 5xx/429 statuses
    /// - `WxError::InvalidInput` for other 4xx statuses
    /// - `WxError::Serialization` if the body is not JSON
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let response = self.get_with_retry(url, query).await?;
        let response = response.error_for_status().map_err(map_reqwest)?;
        response.json::<Value>().await.map_err(map_reqwest)
    }

    async fn get_with_retry(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = self.inner.get(url).query(query).send().await;

            let retryable = match &outcome {
                Ok(response) => is_retryable_status(response.status()),
                Err(err) => is_retryable_transport(err),
            };
            // Query strings carry app secrets and tokens, so only the path is logged
            match &outcome {
                Ok(response) => debug!(
                    attempt,
                    path = response.url().path(),
                    status = %response.status(),
                    "platform response"
                ),
                Err(err) => debug!(attempt, error = %redact_url(err), "platform request failed"),
            }

            if retryable && self.retry.has_retry_after(attempt) {
                let delay = self.retry.delay_before(attempt);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                continue;
            }

            return outcome.map_err(map_reqwest);
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout, covering connect and body.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts per call, including the first. Clamped to at least 1.
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry = RetryPolicy::new(attempts, self.retry.base_delay);
        self
    }

    /// Delay before the first retry.
    #[must_use]
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry = RetryPolicy::new(self.retry.attempts, backoff);
        self
    }

    /// `User-Agent` header sent with every request.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// # Errors
    /// Returns `WxError::Network` if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient> {
        let inner = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .no_proxy()
            .build()
            .map_err(map_reqwest)?;
        Ok(HttpClient { inner, retry: self.retry })
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
}

fn is_retryable_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

fn map_reqwest(err: reqwest::Error) -> WxError {
    InfraError::from(err.without_url()).into()
}

/// Render `err` with its URL reduced to the path.
fn redact_url(err: &reqwest::Error) -> String {
    let rendered = err.to_string();
    match err.url() {
        Some(url) => rendered.replace(url.as_str(), url.path()),
        None => rendered,
    }
}
