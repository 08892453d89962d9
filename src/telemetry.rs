//! Telemetry metric name constants.
//!
//! Centralised metric names for curator operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `curator_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `recommendation_type`: origin of a recommendation (currently "catalog")
//! - `status`: outcome: "ok" or "error"
//! - `flag`: feature flag key

/// Total recommendations returned to callers.
///
/// Labels: `recommendation_type`.
pub const RECOMMENDATIONS_TOTAL: &str = "curator_recommendations_total";

/// Current number of product ids held by the cache.
pub const CACHE_SIZE: &str = "curator_cache_size";

/// Cache-enabled requests served from the existing pool.
pub const CACHE_HITS_TOTAL: &str = "curator_cache_hits_total";

/// Cache-enabled requests that refreshed the pool from the catalog.
pub const CACHE_MISSES_TOTAL: &str = "curator_cache_misses_total";

/// Refreshes that evicted entries to respect the size bound.
pub const CACHE_TRUNCATIONS_TOTAL: &str = "curator_cache_truncations_total";

/// Product ids evicted from the cache.
pub const CACHE_EVICTIONS_TOTAL: &str = "curator_cache_evictions_total";

/// Total catalog `ListProducts` calls.
///
/// Labels: `status` ("ok" | "error").
pub const CATALOG_REQUESTS_TOTAL: &str = "curator_catalog_requests_total";

/// Catalog call duration in seconds.
pub const CATALOG_REQUEST_DURATION_SECONDS: &str = "curator_catalog_request_duration_seconds";

/// Flag evaluations that fell back to the default value.
///
/// Labels: `flag`.
pub const FLAG_FALLBACKS_TOTAL: &str = "curator_flag_fallbacks_total";

/// Label value for recommendations drawn from the product catalog.
pub const RECOMMENDATION_TYPE_CATALOG: &str = "catalog";
