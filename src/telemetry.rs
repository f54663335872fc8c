//! Telemetry metric name constants.
//!
//! Centralised metric names for drydock operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `drydock_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).

/// Proxy reads served from the cache.
pub const CACHE_HITS_TOTAL: &str = "drydock_cache_hits_total";

/// Proxy reads that had to go upstream.
pub const CACHE_MISSES_TOTAL: &str = "drydock_cache_misses_total";

/// Upstream responses that could not be written to the cache.
pub const CACHE_WRITE_FAILURES_TOTAL: &str = "drydock_cache_write_failures_total";

/// Total upstream requests.
///
/// Labels: `status` ("ok" | "timeout" | "http_error" | "network_error" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "drydock_upstream_requests_total";

/// Upstream request duration in seconds.
pub const UPSTREAM_DURATION_SECONDS: &str = "drydock_upstream_duration_seconds";
