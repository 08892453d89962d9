//! gRPC server, catalog client and shared proto types.
//!
//! This module provides:
//! - Generated protobuf types (`proto`) for the recommendation, catalog and
//!   health services
//! - Type conversions between native and proto types (`convert`)
//! - The gRPC catalog client (`catalog`)
//! - The gRPC service implementations (`service`)
//! - Configuration types (`config`)

pub mod catalog;
pub mod config;
pub mod convert;
pub mod service;

use std::sync::Arc;

use tracing::info;

pub use catalog::GrpcCatalogClient;
pub use service::{CuratorService, HealthService};

use crate::providers::{FlagGate, OfrepConfig, OfrepFlagGate, StaticFlags};
use crate::{CacheConfig, ProductCache, Recommender, Result, Selector};
use config::{Config, FlagProvider};

/// Re-exported generated proto types.
pub mod proto {
    tonic::include_proto!("oteldemo");

    /// `grpc.health.v1` types.
    pub mod health {
        tonic::include_proto!("grpc.health.v1");
    }
}

/// Wire a [`Recommender`] from configuration.
///
/// The catalog channel connects lazily, so this succeeds while the catalog
/// is unreachable. Must be called from within a tokio runtime.
pub fn build_recommender(config: &Config) -> Result<Recommender> {
    let catalog = GrpcCatalogClient::connect_lazy(&config.catalog.address, config.catalog.timeout())?;
    let cache_config = CacheConfig::from(&config.cache);
    cache_config.validate()?;
    let cache = Arc::new(ProductCache::new(Arc::new(catalog), &cache_config));

    let flags: Arc<dyn FlagGate> = match config.flags.provider {
        FlagProvider::Flagd => Arc::new(OfrepFlagGate::new(&OfrepConfig::from(&config.flags))?),
        FlagProvider::Static => {
            let gate = StaticFlags::new();
            for (flag, enabled) in &config.flags.values {
                gate.set(flag.clone(), *enabled);
            }
            Arc::new(gate)
        }
    };
    info!(
        provider = flags.name(),
        flag = %config.flags.cache_flag,
        "flag gate configured"
    );

    let selector = Selector::new(config.recommendations.max_responses);
    Ok(Recommender::new(flags, cache, selector).cache_flag(config.flags.cache_flag.clone()))
}
