//! JSON bodies of the administrative endpoints.

use serde::Serialize;

use crate::cache::CacheFileStats;
use crate::proxy::{ClearReport, HealthReport};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub message: String,
    pub files_deleted: usize,
    pub timestamp: String,
}

impl From<ClearReport> for ClearResponse {
    fn from(report: ClearReport) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            files_deleted: report.files_deleted,
            timestamp: report.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub cache: CacheHealth,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub count: usize,
    pub files: Vec<CacheFileEntry>,
}

/// One record as reported by `/health`, with human-readable size and age.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheFileEntry {
    pub file: String,
    pub size_bytes: u64,
    pub size: String,
    pub age: Option<String>,
    pub age_seconds: Option<u64>,
    pub valid: bool,
}

impl From<CacheFileStats> for CacheFileEntry {
    fn from(stats: CacheFileStats) -> Self {
        Self {
            size: format!("{:.2} KB", stats.size_bytes as f64 / 1024.0),
            age: stats
                .age_seconds
                .map(|secs| format!("{:.1}h", secs as f64 / 3600.0)),
            file: stats.file,
            size_bytes: stats.size_bytes,
            age_seconds: stats.age_seconds,
            valid: stats.valid,
        }
    }
}

impl From<HealthReport> for HealthResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            status: report.status.to_string(),
            version: report.version.to_string(),
            timestamp: report.timestamp.to_rfc3339(),
            cache: CacheHealth {
                count: report.cache_count,
                files: report.cache_files.into_iter().map(Into::into).collect(),
            },
        }
    }
}
