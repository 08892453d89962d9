//! Collaborator traits for the recommendation core.
//!
//! The core never talks to the network directly. It consumes two seams:
//! - [`CatalogClient`]: the upstream product catalog
//! - [`FlagGate`]: per-request feature flag evaluation
//!
//! Production implementations live in [`crate::server::catalog`] (gRPC) and
//! [`super::flagd`] (OFREP over HTTP); tests substitute in-memory fakes.
//!
//! # Failure Semantics
//!
//! - Catalog failures are terminal for the request and must surface as
//!   `UpstreamUnavailable` or `UpstreamTimeout`
//! - Flag gates never fail; they answer the caller's default instead

use async_trait::async_trait;

use crate::Result;
use crate::types::ProductId;

// ============================================================================
// Catalog Client
// ============================================================================

/// Source of the full, current product id list.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Client name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch every product id currently listed by the catalog.
    ///
    /// Ids are returned in catalog order. Duplicates are tolerated; the
    /// cache and selector deduplicate.
    async fn list_products(&self) -> Result<Vec<ProductId>>;
}

// ============================================================================
// Feature Flag Gate
// ============================================================================

/// Boolean feature flag evaluation.
#[async_trait]
pub trait FlagGate: Send + Sync {
    /// Gate name for logging/debugging.
    fn name(&self) -> &str;

    /// Evaluate `flag`, answering `default` on any internal failure.
    async fn get_boolean_flag(&self, flag: &str, default: bool) -> bool;
}
