//! [`GrpcCatalogClient`]: a [`CatalogClient`] over the catalog's gRPC API.

use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};

use super::convert::{catalog_error, products_from_response};
use super::proto;
use super::proto::product_catalog_service_client::ProductCatalogServiceClient;
use crate::providers::CatalogClient;
use crate::types::ProductId;
use crate::{CuratorError, Result};

/// Catalog client calling `ProductCatalogService/ListProducts`.
///
/// Every call is bounded by the configured timeout; exceeding it yields
/// [`CuratorError::UpstreamTimeout`].
pub struct GrpcCatalogClient {
    inner: ProductCatalogServiceClient<Channel>,
    address: String,
    timeout: Duration,
}

impl GrpcCatalogClient {
    /// Create a client that connects on first use.
    ///
    /// Lets the service start while the catalog is still coming up. Must be
    /// called from within a tokio runtime.
    pub fn connect_lazy(address: &str, timeout: Duration) -> Result<Self> {
        let address = normalize_address(address);
        let channel = endpoint(&address, timeout)?.connect_lazy();
        Ok(Self {
            inner: ProductCatalogServiceClient::new(channel),
            address,
            timeout,
        })
    }

    /// Connect eagerly, failing if the catalog is unreachable.
    pub async fn connect(address: &str, timeout: Duration) -> Result<Self> {
        let address = normalize_address(address);
        let channel = endpoint(&address, timeout)?
            .connect()
            .await
            .map_err(|e| {
                CuratorError::UpstreamUnavailable(format!("failed to connect to {address}: {e}"))
            })?;
        Ok(Self {
            inner: ProductCatalogServiceClient::new(channel),
            address,
            timeout,
        })
    }

    /// The normalized catalog URI.
    pub fn address(&self) -> &str {
        &self.address
    }
}

fn endpoint(address: &str, timeout: Duration) -> Result<Endpoint> {
    Endpoint::from_shared(address.to_string())
        .map(|endpoint| endpoint.connect_timeout(timeout))
        .map_err(|e| CuratorError::Configuration(format!("invalid catalog address {address:?}: {e}")))
}

/// Accept bare `host:port` addresses by assuming plaintext HTTP/2.
fn normalize_address(address: &str) -> String {
    let address = address.trim();
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}

#[async_trait]
impl CatalogClient for GrpcCatalogClient {
    fn name(&self) -> &str {
        "grpc"
    }

    async fn list_products(&self) -> Result<Vec<ProductId>> {
        let mut client = self.inner.clone();
        let call = client.list_products(proto::Empty {});
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| CuratorError::UpstreamTimeout(self.timeout))?
            .map_err(catalog_error)?;
        Ok(products_from_response(response.into_inner()))
    }
}
