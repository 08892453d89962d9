//! Insertion-ordered, deduplicated, size-bounded product id store.

use std::collections::{HashSet, VecDeque};

use crate::types::ProductId;

/// What a [`CachedPool::merge`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Ids appended because they were not yet present.
    pub added: usize,
    /// Ids dropped from the front to respect the size bound.
    pub evicted: usize,
}

impl MergeOutcome {
    pub fn truncated(&self) -> bool {
        self.evicted > 0
    }
}

/// The product ids held by the cache.
///
/// Ids are kept in arrival order. A merge appends ids not already present,
/// then evicts from the front (oldest first) until the pool fits. Existing
/// ids are never reordered.
#[derive(Debug, Default, Clone)]
pub struct CachedPool {
    entries: VecDeque<ProductId>,
    members: HashSet<ProductId>,
}

impl CachedPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Iterate ids oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.entries.iter()
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<ProductId> {
        self.entries.iter().cloned().collect()
    }

    /// Append unseen ids from `fresh`, then evict oldest entries until at
    /// most `max_entries` remain.
    ///
    /// Eviction happens after the whole batch is merged, so a large batch
    /// can evict ids it added itself.
    pub fn merge<I>(&mut self, fresh: I, max_entries: usize) -> MergeOutcome
    where
        I: IntoIterator<Item = ProductId>,
    {
        let mut outcome = MergeOutcome::default();
        for id in fresh {
            if self.members.insert(id.clone()) {
                self.entries.push_back(id);
                outcome.added += 1;
            }
        }
        while self.entries.len() > max_entries {
            let Some(oldest) = self.entries.pop_front() else {
                break;
            };
            self.members.remove(&oldest);
            outcome.evicted += 1;
        }
        outcome
    }
}
