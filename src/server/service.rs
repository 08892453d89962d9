//! gRPC service implementations.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::Stream;
use tonic::{Request, Response, Status};
use tracing::debug;

use super::convert::recommendations_response;
use super::proto;
use super::proto::health::health_check_response::ServingStatus;
use super::proto::health::health_server::Health;
use super::proto::health::{HealthCheckRequest, HealthCheckResponse};
use super::proto::recommendation_service_server::RecommendationService;
use crate::Recommender;

/// gRPC recommendation service wrapping a [`Recommender`].
pub struct CuratorService {
    recommender: Arc<Recommender>,
}

impl CuratorService {
    /// Create a new service wrapping the given recommender.
    pub fn new(recommender: Arc<Recommender>) -> Self {
        Self { recommender }
    }
}

#[tonic::async_trait]
impl RecommendationService for CuratorService {
    async fn list_recommendations(
        &self,
        request: Request<proto::ListRecommendationsRequest>,
    ) -> Result<Response<proto::ListRecommendationsResponse>, Status> {
        let request = request.into_inner();
        let products = self
            .recommender
            .list_recommendations(&request.user_id, &request.product_ids)
            .await?;
        Ok(Response::new(recommendations_response(products)))
    }
}

/// Standard gRPC health service. Reports `SERVING` while the process is up.
#[derive(Debug, Default, Clone, Copy)]
pub struct HealthService;

#[tonic::async_trait]
impl Health for HealthService {
    async fn check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        debug!(service = %request.get_ref().service, "health check");
        Ok(Response::new(HealthCheckResponse {
            status: ServingStatus::Serving as i32,
        }))
    }

    type WatchStream = Pin<Box<dyn Stream<Item = Result<HealthCheckResponse, Status>> + Send>>;

    async fn watch(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        Err(Status::unimplemented("health watch is not supported"))
    }
}
