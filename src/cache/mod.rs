//! Product id cache.
//!
//! [`ProductCache`] sits between the request path and the upstream
//! [`CatalogClient`]. Whether it is consulted at all is decided per request
//! by the flag gate, expressed as a [`CacheMode`]:
//!
//! - `Disabled`: the live catalog list is fetched and returned; the cache
//!   is neither read nor written.
//! - `Enabled`: the first request after start always refreshes. After
//!   that, each request refreshes with a configurable probability (default
//!   0.5) and otherwise reuses the pool as-is.
//!
//! # Refresh
//!
//! A refresh fetches the full catalog list, appends ids not yet cached in
//! arrival order, then evicts from the front until the pool holds at most
//! `max_entries` ids. See [`CachedPool::merge`].
//!
//! # Concurrency
//!
//! Pool contents and the first-run latch share one async mutex. Deciding to
//! refresh, fetching, merging and truncating all happen under it, so two
//! requests can never both take the first-run refresh or interleave merges.
//! A hit holds the lock only long enough to decide and snapshot.
//!
//! The current size is mirrored into an atomic after every refresh;
//! [`ProductCache::len`] reads it without touching the lock.
//!
//! # Failure
//!
//! A failed or timed-out catalog call fails the request. The first-run latch
//! still flips (the decision to refresh consumes it) and the pool is left as
//! it was.

pub mod pool;

pub use pool::{CachedPool, MergeOutcome};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::field::Empty;
use tracing::{Span, debug, instrument, warn};

use crate::providers::CatalogClient;
use crate::random::{RandomSource, ThreadRandom};
use crate::telemetry;
use crate::types::{CacheMode, ProductId};
use crate::{CuratorError, Result};

/// Configuration for the product cache.
///
/// ```rust
/// # use curator::CacheConfig;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .refresh_probability(0.25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached product ids. Default: 10,000.
    pub max_entries: usize,
    /// Chance that a cache-enabled request refreshes. Default: 0.5.
    pub refresh_probability: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            refresh_probability: 0.5,
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached product ids.
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the per-request refresh probability.
    pub fn refresh_probability(mut self, p: f64) -> Self {
        self.refresh_probability = p;
        self
    }

    /// Reject configurations the cache cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CuratorError::Configuration(
                "cache max_entries must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.refresh_probability) {
            return Err(CuratorError::Configuration(format!(
                "cache refresh_probability must be within [0, 1], got {}",
                self.refresh_probability
            )));
        }
        Ok(())
    }
}

struct CacheState {
    pool: CachedPool,
    first_run: bool,
}

/// Flag-gated, size-bounded cache of catalog product ids.
///
/// One instance per service, shared across request handlers.
pub struct ProductCache {
    catalog: Arc<dyn CatalogClient>,
    random: Arc<dyn RandomSource>,
    config: CacheConfig,
    state: Mutex<CacheState>,
    size: AtomicUsize,
}

impl ProductCache {
    /// Create an empty cache over `catalog`, drawing from the thread RNG.
    pub fn new(catalog: Arc<dyn CatalogClient>, config: &CacheConfig) -> Self {
        Self {
            catalog,
            random: Arc::new(ThreadRandom),
            config: config.clone(),
            state: Mutex::new(CacheState {
                pool: CachedPool::new(),
                first_run: true,
            }),
            size: AtomicUsize::new(0),
        }
    }

    /// Replace the random source used for refresh decisions.
    pub fn with_random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Number of cached ids as of the last refresh.
    ///
    /// Lock-free; may trail an in-flight refresh.
    pub fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the cached ids, oldest first. Waits for any in-flight refresh.
    pub async fn snapshot(&self) -> Vec<ProductId> {
        self.state.lock().await.pool.snapshot()
    }

    /// Candidate pool for a request whose caching flag is `flag_enabled`.
    pub async fn get_pool(&self, flag_enabled: bool) -> Result<Vec<ProductId>> {
        self.pool_for(CacheMode::from(flag_enabled)).await
    }

    /// Candidate pool for a request served in `mode`.
    #[instrument(
        name = "product_cache.get_pool",
        skip(self),
        fields(
            app.recommendation.cache_enabled = mode.is_enabled(),
            app.cache_hit = Empty,
            app.cache.size = Empty,
            app.cache.truncated = Empty,
        )
    )]
    pub async fn pool_for(&self, mode: CacheMode) -> Result<Vec<ProductId>> {
        match mode {
            CacheMode::Disabled => fetch_catalog(self.catalog.as_ref()).await,
            CacheMode::Enabled => self.cached_pool().await,
        }
    }

    async fn cached_pool(&self) -> Result<Vec<ProductId>> {
        let span = Span::current();
        let mut state = self.state.lock().await;

        let refresh = state.first_run || self.random.unit() < self.config.refresh_probability;
        if !refresh {
            let size = state.pool.len();
            span.record("app.cache_hit", true);
            span.record("app.cache.size", size as u64);
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            debug!(size, "cache hit");
            return Ok(state.pool.snapshot());
        }

        state.first_run = false;
        span.record("app.cache_hit", false);
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        debug!("cache miss, refreshing from catalog");

        let fresh = fetch_catalog(self.catalog.as_ref()).await?;
        let outcome = state.pool.merge(fresh, self.config.max_entries);
        let size = state.pool.len();

        if outcome.truncated() {
            warn!(
                size = size + outcome.evicted,
                limit = self.config.max_entries,
                evicted = outcome.evicted,
                "cache exceeded limit, evicted oldest entries"
            );
            span.record("app.cache.truncated", true);
            metrics::counter!(telemetry::CACHE_TRUNCATIONS_TOTAL).increment(1);
            metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(outcome.evicted as u64);
        }

        self.size.store(size, Ordering::Relaxed);
        metrics::gauge!(telemetry::CACHE_SIZE).set(size as f64);
        span.record("app.cache.size", size as u64);

        Ok(state.pool.snapshot())
    }
}

/// Call the catalog, recording request count and duration.
async fn fetch_catalog(catalog: &dyn CatalogClient) -> Result<Vec<ProductId>> {
    let start = Instant::now();
    let result = catalog.list_products().await;
    let status = if result.is_ok() { "ok" } else { "error" };

    metrics::counter!(telemetry::CATALOG_REQUESTS_TOTAL, "status" => status).increment(1);
    metrics::histogram!(telemetry::CATALOG_REQUEST_DURATION_SECONDS)
        .record(start.elapsed().as_secs_f64());

    match &result {
        Ok(products) => debug!(catalog = catalog.name(), count = products.len(), "catalog listed"),
        Err(e) => warn!(catalog = catalog.name(), error = %e, "catalog request failed"),
    }
    result
}
