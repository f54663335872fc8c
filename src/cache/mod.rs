//! Response cache subsystem.
//!
//! [`CacheStore`] is the key→payload store the proxy consults before going
//! upstream. The only implementation shipped is [`DiskCache`], which keeps
//! one JSON record per sanitized request path under a root directory and
//! expires records lazily on read.
//!
//! Time is read through a [`Clock`] so TTL behaviour can be driven by a
//! [`ManualClock`] in tests.

pub mod clock;
pub mod disk;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use disk::DiskCache;

use crate::error::CacheError;

/// Default time-to-live for cached records: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for a [`DiskCache`].
///
/// ```rust
/// # use drydock::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new("/tmp/drydock-cache").ttl(Duration::from_secs(600));
/// assert_eq!(config.ttl, Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding one record file per key.
    pub dir: PathBuf,
    /// Records at least this old are treated as absent. Default: 24 hours.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a config rooted at `dir` with the default TTL.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set the time-to-live for cached records.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Default cache directory: `~/.cache/drydock`.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("drydock")
}

/// Diagnostic view of one persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFileStats {
    /// Sanitized key (the record's file stem).
    pub file: String,
    pub size_bytes: u64,
    /// `None` when the record could not be parsed.
    pub age_seconds: Option<u64>,
    /// Same TTL rule as [`CacheStore::get`], evaluated at call time.
    pub valid: bool,
}

/// Key→payload store with time-based expiry.
///
/// Payloads are opaque JSON values, returned exactly as stored.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a live record.
    ///
    /// Returns `None` for missing, expired (deleted as a side effect),
    /// unreadable or corrupt records. Never fails.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Persist `value` under `key`, replacing any previous record atomically.
    async fn set(&self, key: &str, value: &Value) -> Result<(), CacheError>;

    /// Delete every record. Returns the number deleted.
    async fn clear_all(&self) -> usize;

    /// Enumerate records without modifying them.
    async fn stats(&self) -> Vec<CacheFileStats>;

    /// Number of persisted records.
    async fn count(&self) -> usize {
        self.stats().await.len()
    }
}

/// Map a raw key to a filesystem-safe token.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, so `vehicles/` and
/// `vehicles_` share a token. [`DiskCache`] stores the original key in the
/// record to detect such collisions. The empty key maps to `_`.
pub fn sanitize_key(key: &str) -> String {
    if key.is_empty() {
        return "_".to_string();
    }
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_each_unsafe_char() {
        assert_eq!(sanitize_key("vehicles/"), "vehicles_");
        assert_eq!(sanitize_key("a//b?c=1"), "a__b_c_1");
        assert_eq!(sanitize_key("media_path/"), "media_path_");
    }

    #[test]
    fn sanitize_keeps_alphanumerics() {
        assert_eq!(sanitize_key("Nations42"), "Nations42");
    }

    #[test]
    fn sanitize_non_ascii_is_replaced() {
        assert_eq!(sanitize_key("ōyodo"), "_yodo");
    }

    #[test]
    fn sanitize_empty_key() {
        assert_eq!(sanitize_key(""), "_");
    }

    #[test]
    fn default_config_uses_24h_ttl() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(86_400));
        assert!(config.dir.ends_with("drydock"));
    }
}
