//! Drydock error types

use std::path::PathBuf;

/// Failure talking to the upstream encyclopedia API.
///
/// Every variant is surfaced to proxy callers as a classified HTTP status;
/// see [`server::error`](crate::server::error) for the mapping.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// No response within the configured bound. The request was cancelled.
    #[error("upstream request timed out")]
    Timeout,

    /// The upstream answered with a non-success status.
    #[error("upstream returned HTTP {status}")]
    Http {
        status: u16,
        body: serde_json::Value,
    },

    /// No response at all (DNS, connection refused, reset).
    #[error("unable to reach upstream: {0}")]
    Network(String),

    #[error("unexpected upstream failure: {0}")]
    Unknown(String),
}

/// Failure reading or writing a persisted cache record.
///
/// Cache errors never reach proxy callers: reads degrade to a miss and
/// writes are logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to read cache record {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt cache record {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write cache record {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize cache record: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Drydock error types
#[derive(Debug, thiserror::Error)]
pub enum DrydockError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    // Catalog transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}) fetching {resource}")]
    Api { status: u16, resource: String },

    #[error("API returned status '{status}' for {resource}")]
    BadEnvelope { status: String, resource: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DrydockError {
    /// Whether retrying the same operation later might succeed.
    ///
    /// Timeouts, network failures and 5xx/429 responses are transient;
    /// malformed data and configuration problems are not.
    pub fn is_transient(&self) -> bool {
        match self {
            DrydockError::Upstream(UpstreamError::Timeout | UpstreamError::Network(_)) => true,
            DrydockError::Upstream(UpstreamError::Http { status, .. })
            | DrydockError::Api { status, .. } => *status == 429 || *status >= 500,
            DrydockError::Http(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for Drydock operations
pub type Result<T> = std::result::Result<T, DrydockError>;
