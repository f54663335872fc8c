//! One-file-per-key cache persisted under a root directory.
//!
//! Each record lives at `<root>/<sanitized key>.json` and holds
//! `{ "key", "data", "timestamp" }`. Writes go to a uniquely named
//! temporary file in the same directory and are renamed over the target,
//! so readers only ever observe complete records.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{CacheConfig, CacheFileStats, CacheStore, Clock, SystemClock, sanitize_key};
use crate::error::CacheError;

const RECORD_EXTENSION: &str = "json";

/// On-disk record. `key` is absent in records written by older versions.
#[derive(Debug, Deserialize)]
struct CacheRecord {
    #[serde(default)]
    key: Option<String>,
    data: Value,
    timestamp: i64,
}

#[derive(Serialize)]
struct CacheRecordRef<'a> {
    key: &'a str,
    data: &'a Value,
    timestamp: i64,
}

/// Disk-backed [`CacheStore`].
pub struct DiskCache {
    root: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    tmp_seq: AtomicU64,
}

impl DiskCache {
    /// Open (creating if needed) a cache rooted at `config.dir`.
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Open a cache that reads time from `clock`.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&config.dir).map_err(|source| CacheError::Write {
            path: config.dir.clone(),
            source,
        })?;
        info!(dir = %config.dir.display(), ttl_secs = config.ttl.as_secs(), "cache directory ready");
        Ok(Self {
            root: config.dir.clone(),
            ttl: config.ttl,
            clock,
            tmp_seq: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{RECORD_EXTENSION}", sanitize_key(key)))
    }

    fn temp_path(&self, token: &str) -> PathBuf {
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        self.root
            .join(format!(".{token}.{}.{seq}.tmp", std::process::id()))
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Milliseconds since `timestamp`, clamped at zero for future stamps.
    fn age_millis(&self, timestamp: i64) -> i64 {
        self.clock.now_millis().saturating_sub(timestamp).max(0)
    }

    fn is_live(&self, timestamp: i64) -> bool {
        self.age_millis(timestamp) < self.ttl_millis()
    }

    async fn read_record(path: &Path) -> Result<Option<CacheRecord>, CacheError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| CacheError::Corrupt {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn remove(path: &Path) -> bool {
        match tokio::fs::remove_file(path).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to delete cache record");
                false
            }
        }
    }

    /// Delete the record at `path` only if it still carries the expired
    /// `timestamp`. A record renamed into place by a concurrent `set` survives.
    async fn remove_if_stale(&self, path: &Path, timestamp: i64) -> bool {
        match Self::read_record(path).await {
            Ok(Some(current)) if current.timestamp != timestamp => {
                debug!(path = %path.display(), "record replaced concurrently, keeping it");
                false
            }
            Ok(None) => false,
            _ => Self::remove(path).await,
        }
    }

    /// Paths of all record files, sorted. Temporary files are skipped.
    async fn record_files(&self) -> Vec<PathBuf> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(dir = %self.root.display(), error = %e, "failed to list cache directory");
                return Vec::new();
            }
        };

        let mut files = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if is_record_file(&path) {
                        files.push(path);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %self.root.display(), error = %e, "error while listing cache directory");
                    break;
                }
            }
        }
        files.sort();
        files
    }
}

fn is_record_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_none_or(|n| n.starts_with('.'));
    !hidden && path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl CacheStore for DiskCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let path = self.record_path(key);
        let record = match Self::read_record(&path).await {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        if record.key.as_deref().is_some_and(|stored| stored != key) {
            debug!(key, path = %path.display(), "cache token collision, treating as miss");
            return None;
        }

        if !self.is_live(record.timestamp) {
            debug!(key, "cache record expired");
            self.remove_if_stale(&path, record.timestamp).await;
            return None;
        }

        Some(record.data)
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), CacheError> {
        let token = sanitize_key(key);
        let path = self.record_path(key);
        let record = CacheRecordRef {
            key,
            data: value,
            timestamp: self.clock.now_millis(),
        };
        let bytes = serde_json::to_vec(&record).map_err(CacheError::Serialize)?;

        // The directory may have been removed out from under us.
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| CacheError::Write {
                path: self.root.clone(),
                source,
            })?;

        let tmp_path = self.temp_path(&token);
        if let Err(source) = tokio::fs::write(&tmp_path, &bytes).await {
            Self::remove(&tmp_path).await;
            return Err(CacheError::Write {
                path: tmp_path,
                source,
            });
        }
        if let Err(source) = tokio::fs::rename(&tmp_path, &path).await {
            Self::remove(&tmp_path).await;
            return Err(CacheError::Write { path, source });
        }

        debug!(key, bytes = bytes.len(), "cache record written");
        Ok(())
    }

    async fn clear_all(&self) -> usize {
        let mut deleted = 0;
        for path in self.record_files().await {
            if Self::remove(&path).await {
                deleted += 1;
            }
        }
        info!(deleted, "cache cleared");
        deleted
    }

    async fn stats(&self) -> Vec<CacheFileStats> {
        let mut stats = Vec::new();
        for path in self.record_files().await {
            let size_bytes = match tokio::fs::metadata(&path).await {
                Ok(meta) => meta.len(),
                // Deleted between listing and stat.
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to stat cache record");
                    0
                }
            };

            let (age_seconds, valid) = match Self::read_record(&path).await {
                Ok(Some(record)) => {
                    let age = self.age_millis(record.timestamp);
                    (Some((age / 1000) as u64), self.is_live(record.timestamp))
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, "unreadable cache record in stats");
                    (None, false)
                }
            };

            stats.push(CacheFileStats {
                file: file_stem(&path),
                size_bytes,
                age_seconds,
                valid,
            });
        }
        stats
    }

    async fn count(&self) -> usize {
        self.record_files().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_file_filter() {
        assert!(is_record_file(Path::new("/c/vehicles_.json")));
        assert!(!is_record_file(Path::new("/c/.vehicles_.123.0.tmp")));
        assert!(!is_record_file(Path::new("/c/notes.txt")));
        assert!(!is_record_file(Path::new("/c/.json")));
    }

    #[test]
    fn legacy_record_without_key_parses() {
        let record: CacheRecord =
            serde_json::from_str(r#"{"data": {"a": 1}, "timestamp": 5}"#).unwrap();
        assert!(record.key.is_none());
        assert_eq!(record.timestamp, 5);
    }

    #[tokio::test]
    async fn stale_removal_keeps_a_replaced_record() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(&CacheConfig::new(dir.path())).unwrap();
        let path = cache.record_path("vehicles/");

        std::fs::write(&path, r#"{"key": "vehicles/", "data": 2, "timestamp": 200}"#).unwrap();
        assert!(!cache.remove_if_stale(&path, 100).await);
        assert!(path.exists());

        assert!(cache.remove_if_stale(&path, 200).await);
        assert!(!path.exists());
    }

    #[test]
    fn temp_paths_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(&CacheConfig::new(dir.path())).unwrap();
        let a = cache.temp_path("k");
        let b = cache.temp_path("k");
        assert_ne!(a, b);
        assert!(!is_record_file(&a));
    }
}
