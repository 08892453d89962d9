//! Conversions between proto types, native types and gRPC status codes.

use tonic::Status;

use super::proto;
use crate::CuratorError;
use crate::types::ProductId;

// =============================================================================
// Errors
// =============================================================================

impl From<CuratorError> for Status {
    fn from(err: CuratorError) -> Self {
        let message = err.to_string();
        match err {
            CuratorError::MalformedInput(_) => Status::invalid_argument(message),
            CuratorError::UpstreamUnavailable(_) => Status::unavailable(message),
            CuratorError::UpstreamTimeout(_) => Status::deadline_exceeded(message),
            CuratorError::FlagService(_) | CuratorError::Configuration(_) => {
                Status::internal(message)
            }
        }
    }
}

/// Convert a status returned by the catalog into a [`CuratorError`].
///
/// Every catalog failure is an upstream failure from the caller's point of
/// view, whatever code the catalog chose.
pub fn catalog_error(status: Status) -> CuratorError {
    CuratorError::UpstreamUnavailable(format!("{:?}: {}", status.code(), status.message()))
}

// =============================================================================
// Messages
// =============================================================================

/// Product ids of a catalog listing, in catalog order.
pub fn products_from_response(response: proto::ListProductsResponse) -> Vec<ProductId> {
    response
        .products
        .into_iter()
        .map(|product| ProductId::from(product.id))
        .collect()
}

/// Build the wire response for a recommendation.
pub fn recommendations_response(products: Vec<ProductId>) -> proto::ListRecommendationsResponse {
    proto::ListRecommendationsResponse {
        product_ids: products.into_iter().map(String::from).collect(),
    }
}
