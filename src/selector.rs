//! Recommendation selection: filter out seen products, sample the rest.

use std::collections::HashSet;
use std::sync::Arc;

use crate::random::{RandomSource, ThreadRandom};
use crate::types::ProductId;

/// Default number of recommendations returned per request.
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

/// Result of a selection, with the size of the pool it was drawn from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Distinct candidates left after exclusion.
    pub filtered_count: usize,
    /// The sampled products.
    pub products: Vec<ProductId>,
}

/// `pool` minus `exclude`, deduplicated, in first-seen pool order.
pub fn filter_candidates(pool: &[ProductId], exclude: &HashSet<ProductId>) -> Vec<ProductId> {
    let mut seen = HashSet::with_capacity(pool.len());
    pool.iter()
        .filter(|id| !exclude.contains(*id) && seen.insert(*id))
        .cloned()
        .collect()
}

/// Draw up to `max_count` distinct products from `pool` minus `exclude`,
/// uniformly without replacement.
///
/// Returns `min(max_count, |pool - exclude|)` products; an empty candidate
/// set yields an empty result. Order of the result carries no meaning.
pub fn select(
    pool: &[ProductId],
    exclude: &HashSet<ProductId>,
    max_count: usize,
    random: &dyn RandomSource,
) -> Vec<ProductId> {
    let candidates = filter_candidates(pool, exclude);
    sample(&candidates, max_count, random)
}

fn sample(candidates: &[ProductId], max_count: usize, random: &dyn RandomSource) -> Vec<ProductId> {
    let amount = max_count.min(candidates.len());
    if amount == 0 {
        return Vec::new();
    }
    random
        .sample_indices(candidates.len(), amount)
        .into_iter()
        .map(|i| candidates[i].clone())
        .collect()
}

/// Configured selector: a fixed `max_count` and a random source.
pub struct Selector {
    max_count: usize,
    random: Arc<dyn RandomSource>,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECOMMENDATIONS)
    }
}

impl Selector {
    /// Create a selector returning at most `max_count` products.
    pub fn new(max_count: usize) -> Self {
        Self {
            max_count,
            random: Arc::new(ThreadRandom),
        }
    }

    /// Replace the random source used for sampling.
    pub fn with_random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Filter and sample, reporting how many candidates were available.
    pub fn select(&self, pool: &[ProductId], exclude: &HashSet<ProductId>) -> Selection {
        let candidates = filter_candidates(pool, exclude);
        Selection {
            filtered_count: candidates.len(),
            products: sample(&candidates, self.max_count, self.random.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    fn ids(names: &[&str]) -> Vec<ProductId> {
        names.iter().copied().map(ProductId::from).collect()
    }

    fn set(names: &[&str]) -> HashSet<ProductId> {
        ids(names).into_iter().collect()
    }

    #[test]
    fn filter_keeps_first_seen_order() {
        let pool = ids(&["c", "a", "c", "b", "a"]);
        let candidates = filter_candidates(&pool, &set(&["b"]));
        assert_eq!(candidates, ids(&["c", "a"]));
    }

    #[test]
    fn selector_reports_filtered_count() {
        let selector = Selector::new(2).with_random_source(Arc::new(SeededRandom::new(1)));
        let selection = selector.select(&ids(&["p1", "p2", "p3", "p4"]), &set(&["p4"]));
        assert_eq!(selection.filtered_count, 3);
        assert_eq!(selection.products.len(), 2);
    }

    #[test]
    fn zero_max_count_returns_nothing() {
        let selection = Selector::new(0).select(&ids(&["p1"]), &HashSet::new());
        assert_eq!(selection.filtered_count, 1);
        assert!(selection.products.is_empty());
    }

    #[test]
    fn default_selector_returns_five() {
        assert_eq!(Selector::default().max_count(), DEFAULT_MAX_RECOMMENDATIONS);
    }
}
