//! Tests for metrics emitted by the cache, recommender and flag gate.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use curator::{
    CacheConfig, CatalogClient, CuratorError, FlagGate, OfrepConfig, OfrepFlagGate, ProductCache,
    ProductId, RandomSource, Recommender, Result, Selector, StaticFlags, telemetry,
};

// ============================================================================
// Fakes
// ============================================================================

struct MockCatalog {
    listings: Mutex<VecDeque<Vec<&'static str>>>,
}

impl MockCatalog {
    fn new(listings: Vec<Vec<&'static str>>) -> Self {
        Self {
            listings: Mutex::new(listings.into()),
        }
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_products(&self) -> Result<Vec<ProductId>> {
        let next = self.listings.lock().unwrap().pop_front();
        match next {
            Some(ids) => Ok(ids.into_iter().map(ProductId::from).collect()),
            None => Err(CuratorError::UpstreamUnavailable("exhausted".to_string())),
        }
    }
}

/// Always refreshes after the first request.
struct AlwaysRefresh;

impl RandomSource for AlwaysRefresh {
    fn unit(&self) -> f64 {
        0.0
    }

    fn sample_indices(&self, _length: usize, amount: usize) -> Vec<usize> {
        (0..amount).collect()
    }
}

/// Never refreshes after the first request.
struct NeverRefresh;

impl RandomSource for NeverRefresh {
    fn unit(&self) -> f64 {
        0.99
    }

    fn sample_indices(&self, _length: usize, amount: usize) -> Vec<usize> {
        (0..amount).collect()
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Latest value of a gauge, if it was ever set.
fn gauge_value(snapshot: &SnapshotVec, name: &str) -> Option<f64> {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Gauge && key.key().name() == name)
        .find_map(|(_, _, _, value)| match value {
            DebugValue::Gauge(v) => Some(v.into_inner()),
            _ => None,
        })
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

/// Run `fut` on the current multi-thread runtime with `recorder` installed.
fn with_recorder<F, T>(recorder: &DebuggingRecorder, fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    metrics::with_local_recorder(recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(fut))
    })
}

fn recommender(
    catalog: MockCatalog,
    max_entries: usize,
    random: Arc<dyn RandomSource>,
) -> Recommender {
    let cache = ProductCache::new(
        Arc::new(catalog),
        &CacheConfig::new().max_entries(max_entries),
    )
    .with_random_source(random);
    let flags = Arc::new(StaticFlags::with_flag("recommendationCacheFailure", true));
    Recommender::new(flags, Arc::new(cache), Selector::default())
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn recommendations_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let rec = recommender(
        MockCatalog::new(vec![vec!["a", "b", "c"]]),
        10,
        Arc::new(NeverRefresh),
    );
    let products = with_recorder(&recorder, async {
        rec.list_recommendations("user-1", &["a".to_string()]).await
    })
    .unwrap();
    assert_eq!(products.len(), 2);

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::RECOMMENDATIONS_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::CATALOG_REQUESTS_TOTAL), 1);
    assert!(has_histogram(
        &snapshot,
        telemetry::CATALOG_REQUEST_DURATION_SECONDS
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn hits_and_misses_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let rec = recommender(
        MockCatalog::new(vec![vec!["a", "b", "c"]]),
        10,
        Arc::new(NeverRefresh),
    );
    with_recorder(&recorder, async {
        for _ in 0..3 {
            rec.list_recommendations("user-1", &[]).await.unwrap();
        }
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 2);
    assert_eq!(gauge_value(&snapshot, telemetry::CACHE_SIZE), Some(3.0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn truncation_is_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let rec = recommender(
        MockCatalog::new(vec![vec!["p1", "p2", "p3"], vec!["p3", "p5"]]),
        3,
        Arc::new(AlwaysRefresh),
    );
    with_recorder(&recorder, async {
        rec.list_recommendations("user-1", &[]).await.unwrap();
        rec.list_recommendations("user-1", &[]).await.unwrap();
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_TRUNCATIONS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_EVICTIONS_TOTAL), 1);
    assert_eq!(gauge_value(&snapshot, telemetry::CACHE_SIZE), Some(3.0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_catalog_call_is_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let rec = recommender(MockCatalog::new(vec![]), 10, Arc::new(NeverRefresh));
    let result = with_recorder(&recorder, async {
        rec.list_recommendations("user-1", &[]).await
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CATALOG_REQUESTS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::RECOMMENDATIONS_TOTAL), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn flag_fallback_is_counted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let gate = OfrepFlagGate::new(&OfrepConfig::new(server.uri())).unwrap();
    let enabled = with_recorder(&recorder, async {
        gate.get_boolean_flag("recommendationCacheFailure", false)
            .await
    });
    assert!(!enabled);

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::FLAG_FALLBACKS_TOTAL), 1);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let rec = recommender(
        MockCatalog::new(vec![vec!["a", "b"]]),
        10,
        Arc::new(NeverRefresh),
    );
    rec.list_recommendations("user-1", &[]).await.unwrap();
}
