//! Request orchestration.
//!
//! For each request: parse the exclusion ids, ask the flag gate whether
//! caching is on, obtain a candidate pool from the [`ProductCache`], sample
//! with the [`Selector`] and count what was returned.

use std::sync::Arc;

use tracing::field::Empty;
use tracing::{Span, info, instrument};

use crate::Result;
use crate::cache::ProductCache;
use crate::providers::FlagGate;
use crate::selector::Selector;
use crate::telemetry;
use crate::types::{CacheMode, ProductId, RequestContext};

/// Flag key that turns the product cache on.
pub const DEFAULT_CACHE_FLAG: &str = "recommendationCacheFailure";

/// Serves recommendation requests.
pub struct Recommender {
    flags: Arc<dyn FlagGate>,
    cache: Arc<ProductCache>,
    selector: Selector,
    cache_flag: String,
}

impl Recommender {
    pub fn new(flags: Arc<dyn FlagGate>, cache: Arc<ProductCache>, selector: Selector) -> Self {
        Self {
            flags,
            cache,
            selector,
            cache_flag: DEFAULT_CACHE_FLAG.to_string(),
        }
    }

    /// Use a different flag key to gate caching.
    pub fn cache_flag(mut self, flag: impl Into<String>) -> Self {
        self.cache_flag = flag.into();
        self
    }

    /// The cache behind this recommender.
    pub fn cache(&self) -> &Arc<ProductCache> {
        &self.cache
    }

    /// Recommend products for a caller who has already seen `product_ids`.
    ///
    /// Malformed ids fail before the flag gate or cache are consulted.
    pub async fn list_recommendations(
        &self,
        user_id: &str,
        product_ids: &[String],
    ) -> Result<Vec<ProductId>> {
        let ctx = RequestContext::parse(user_id, product_ids)?;
        let enabled = self.flags.get_boolean_flag(&self.cache_flag, false).await;
        self.recommend(&ctx.with_cache_mode(CacheMode::from(enabled)))
            .await
    }

    /// Recommend products for an already parsed request.
    #[instrument(
        name = "recommender.recommend",
        skip_all,
        fields(
            user_id = %ctx.user_id,
            app.recommendation.cache_enabled = ctx.cache_mode.is_enabled(),
            app.products.count = Empty,
            app.filtered_products.count = Empty,
            app.products_recommended.count = Empty,
        )
    )]
    pub async fn recommend(&self, ctx: &RequestContext) -> Result<Vec<ProductId>> {
        let span = Span::current();

        let pool = self.cache.pool_for(ctx.cache_mode).await?;
        span.record("app.products.count", pool.len() as u64);

        let selection = self.selector.select(&pool, &ctx.exclude);
        span.record("app.filtered_products.count", selection.filtered_count as u64);
        span.record(
            "app.products_recommended.count",
            selection.products.len() as u64,
        );

        metrics::counter!(
            telemetry::RECOMMENDATIONS_TOTAL,
            "recommendation_type" => telemetry::RECOMMENDATION_TYPE_CATALOG
        )
        .increment(selection.products.len() as u64);

        info!(
            user_id = %ctx.user_id,
            products = ?selection.products,
            "list recommendations"
        );
        Ok(selection.products)
    }
}
