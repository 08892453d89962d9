//! Per-request data: exclusion ids and the caching decision.

use std::collections::HashSet;

use super::ProductId;
use crate::{CuratorError, Result};

/// Longest product id accepted in an exclusion list.
pub const MAX_PRODUCT_ID_LEN: usize = 256;

/// Whether a request is served through the product cache.
///
/// Selected per request from the feature flag gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Pool comes from the cache, refreshed probabilistically.
    Enabled,
    /// Pool is fetched live; the cache is neither read nor written.
    #[default]
    Disabled,
}

impl CacheMode {
    pub fn is_enabled(self) -> bool {
        matches!(self, CacheMode::Enabled)
    }
}

impl From<bool> for CacheMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            CacheMode::Enabled
        } else {
            CacheMode::Disabled
        }
    }
}

/// Data carried by a single recommendation request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Caller identity, used for logging only.
    pub user_id: String,
    /// Products the caller has already seen.
    pub exclude: HashSet<ProductId>,
    /// Flag-gate decision for this call.
    pub cache_mode: CacheMode,
}

impl RequestContext {
    /// Build a context from raw request fields.
    ///
    /// The cache mode starts out `Disabled`; callers set it once the flag
    /// gate has answered.
    pub fn parse<S: AsRef<str>>(user_id: impl Into<String>, raw_ids: &[S]) -> Result<Self> {
        Ok(Self {
            user_id: user_id.into(),
            exclude: parse_exclusions(raw_ids)?,
            cache_mode: CacheMode::Disabled,
        })
    }

    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }
}

/// Parse the exclusion list of a request.
///
/// Accepts both encodings clients send: one id per repeated element, or
/// comma-joined ids inside an element. Surrounding whitespace is trimmed,
/// empty segments are skipped and duplicates collapse.
///
/// Ids containing control characters or longer than
/// [`MAX_PRODUCT_ID_LEN`] bytes are rejected with `MalformedInput`.
pub fn parse_exclusions<S: AsRef<str>>(raw_ids: &[S]) -> Result<HashSet<ProductId>> {
    let mut exclude = HashSet::new();
    for raw in raw_ids {
        for segment in raw.as_ref().split(',') {
            let id = segment.trim();
            if id.is_empty() {
                continue;
            }
            if id.len() > MAX_PRODUCT_ID_LEN {
                return Err(CuratorError::MalformedInput(format!(
                    "product id exceeds {MAX_PRODUCT_ID_LEN} bytes"
                )));
            }
            if id.chars().any(char::is_control) {
                return Err(CuratorError::MalformedInput(format!(
                    "product id {id:?} contains control characters"
                )));
            }
            exclude.insert(ProductId::new(id));
        }
    }
    Ok(exclude)
}
