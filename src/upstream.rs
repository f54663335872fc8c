//! HTTP client for the upstream encyclopedia API.
//!
//! One request per call, to a single fixed origin, bounded by a timeout.
//! Failures are classified into [`UpstreamError`] variants; nothing is
//! retried here.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::UpstreamError;
use crate::telemetry;

/// Default upstream origin.
pub const DEFAULT_BASE_URL: &str = "https://vortex.worldofwarships.eu/api/encyclopedia/en";

/// Browser-like user agent; the upstream rejects default client agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`UpstreamClient`].
///
/// ```rust
/// # use drydock::upstream::UpstreamConfig;
/// # use std::time::Duration;
/// let config = UpstreamConfig::new("http://localhost:8080").timeout(Duration::from_secs(2));
/// assert_eq!(config.timeout, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Config for a custom origin with default timeout and user agent.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// A successful upstream response.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

/// Source of upstream responses.
///
/// Implemented by [`UpstreamClient`]; tests substitute their own.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetch `path` (relative to the upstream origin).
    async fn fetch(&self, path: &str) -> Result<UpstreamResponse, UpstreamError>;
}

/// reqwest-backed [`Upstream`].
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| UpstreamError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the origin and a forwarded path with exactly one slash.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Classify a reqwest failure that produced no usable response.
fn classify(err: &reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else if err.is_connect() || err.is_request() {
        UpstreamError::Network(err.to_string())
    } else {
        UpstreamError::Unknown(err.to_string())
    }
}

/// Parse a body as JSON, keeping it as a JSON string when it isn't.
fn body_value(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn status_label(result: &Result<UpstreamResponse, UpstreamError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(UpstreamError::Timeout) => "timeout",
        Err(UpstreamError::Http { .. }) => "http_error",
        Err(UpstreamError::Network(_)) => "network_error",
        Err(UpstreamError::Unknown(_)) => "error",
    }
}

impl UpstreamClient {
    async fn fetch_inner(&self, url: &str) -> Result<UpstreamResponse, UpstreamError> {
        // Dropping the in-flight future on timeout cancels the request.
        let response = self.http.get(url).send().await.map_err(|e| classify(&e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| classify(&e))?;

        if !status.is_success() {
            return Err(UpstreamError::Http {
                status: status.as_u16(),
                body: body_value(&bytes),
            });
        }

        let body = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::Unknown(format!("invalid JSON from upstream: {e}")))?;
        Ok(UpstreamResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn fetch(&self, path: &str) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url_for(path);
        debug!(%url, "proxying upstream");

        let start = Instant::now();
        let result = self.fetch_inner(&url).await;
        let elapsed = start.elapsed().as_secs_f64();

        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => status_label(&result))
            .increment(1);
        metrics::histogram!(telemetry::UPSTREAM_DURATION_SECONDS).record(elapsed);

        if let Err(ref e) = result {
            warn!(%url, error = %e, elapsed_secs = elapsed, "upstream request failed");
        }
        result
    }
}
