//! Cache-aside proxy over the upstream encyclopedia API.
//!
//! Reads consult the [`CacheStore`] first and only go upstream on a miss.
//! Successful upstream bodies are written back best-effort: a failed cache
//! write is logged and the response is still returned.
//!
//! Concurrent misses for the same path are not coalesced; each one reaches
//! the upstream independently.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheFileStats, CacheStore};
use crate::error::UpstreamError;
use crate::telemetry;
use crate::upstream::Upstream;

/// Where a proxied response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Upstream,
}

impl ResponseSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseSource::Cache => "HIT",
            ResponseSource::Upstream => "MISS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
    pub source: ResponseSource,
}

/// Result of [`CacheProxy::clear_cache`].
#[derive(Debug, Clone)]
pub struct ClearReport {
    pub files_deleted: usize,
    pub timestamp: DateTime<Utc>,
}

/// Result of [`CacheProxy::health`].
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub cache_count: usize,
    pub cache_files: Vec<CacheFileStats>,
}

/// Cache-aside request handler.
///
/// Constructed once at startup and shared (behind `Arc`) by every request.
pub struct CacheProxy {
    cache: Arc<dyn CacheStore>,
    upstream: Arc<dyn Upstream>,
}

impl CacheProxy {
    pub fn new(cache: Arc<dyn CacheStore>, upstream: Arc<dyn Upstream>) -> Self {
        Self { cache, upstream }
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Serve a read for `path`, from cache if possible.
    pub async fn get(&self, path: &str) -> Result<ProxyResponse, UpstreamError> {
        if let Some(body) = self.cache.get(path).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            debug!(path, "cache hit");
            return Ok(ProxyResponse {
                status: 200,
                body,
                source: ResponseSource::Cache,
            });
        }

        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        debug!(path, "cache miss");

        let response = self.upstream.fetch(path).await?;
        if let Err(e) = self.cache.set(path, &response.body).await {
            metrics::counter!(telemetry::CACHE_WRITE_FAILURES_TOTAL).increment(1);
            warn!(path, error = %e, "cache write failed, serving uncached");
        }

        Ok(ProxyResponse {
            status: response.status,
            body: response.body,
            source: ResponseSource::Upstream,
        })
    }

    /// Delete every cached record.
    pub async fn clear_cache(&self) -> ClearReport {
        let files_deleted = self.cache.clear_all().await;
        ClearReport {
            files_deleted,
            timestamp: Utc::now(),
        }
    }

    pub async fn health(&self) -> HealthReport {
        let cache_files = self.cache.stats().await;
        let cache_count = self.cache.count().await;
        HealthReport {
            status: "ok",
            version: crate::PKG_VERSION,
            timestamp: Utc::now(),
            cache_count,
            cache_files,
        }
    }
}
