//! Curator - product recommendations from a cached catalog
//!
//! Answers "given these product ids, suggest others" by pulling the product
//! list from an upstream catalog, optionally through a bounded, flag-gated
//! [`ProductCache`], filtering out products the caller has seen and
//! returning a random sample.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use curator::{
//!     CacheConfig, CatalogClient, ProductCache, ProductId, Recommender, Selector, StaticFlags,
//! };
//!
//! struct FixedCatalog;
//!
//! #[async_trait]
//! impl CatalogClient for FixedCatalog {
//!     fn name(&self) -> &str {
//!         "fixed"
//!     }
//!
//!     async fn list_products(&self) -> curator::Result<Vec<ProductId>> {
//!         Ok(vec!["OLJCESPC7Z".into(), "66VCHSJNUP".into(), "1YMWWN1N4O".into()])
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> curator::Result<()> {
//!     let cache = Arc::new(ProductCache::new(Arc::new(FixedCatalog), &CacheConfig::new()));
//!     let recommender = Recommender::new(Arc::new(StaticFlags::new()), cache, Selector::default());
//!
//!     let products = recommender
//!         .list_recommendations("user-1", &["OLJCESPC7Z".to_string()])
//!         .await?;
//!     println!("{products:?}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod providers;
pub mod random;
pub mod recommender;
pub mod selector;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CachedPool, MergeOutcome, ProductCache};
pub use error::{CuratorError, Result};
pub use providers::{CatalogClient, FlagGate, OfrepConfig, OfrepFlagGate, StaticFlags};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use recommender::{DEFAULT_CACHE_FLAG, Recommender};
pub use selector::{DEFAULT_MAX_RECOMMENDATIONS, Selection, Selector, select};
pub use types::{CacheMode, ProductId, RequestContext};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
