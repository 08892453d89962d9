//! curatord: Curator recommendation daemon.
//!
//! Serves `RecommendationService` and the standard gRPC health service.

use std::sync::Arc;

use clap::Parser;
use tonic::transport::Server;
use tracing::info;

use curator::server::config::Config;
use curator::server::proto::health::health_server::HealthServer;
use curator::server::proto::recommendation_service_server::RecommendationServiceServer;
use curator::server::{CuratorService, HealthService, build_recommender};

/// Curator daemon: product recommendation service.
#[derive(Parser)]
#[command(name = "curatord")]
#[command(version = curator::PKG_VERSION)]
#[command(about = "Curator recommendation daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "CURATOR_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration: file (or defaults), then environment overrides
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_env()?;
    config.validate()?;

    let addr = config.server.socket_addr()?;
    let recommender = Arc::new(build_recommender(&config)?);

    info!(
        version = curator::PKG_VERSION,
        service = %config.server.service_name,
        %addr,
        catalog = %config.catalog.address,
        "curatord starting"
    );

    Server::builder()
        .add_service(RecommendationServiceServer::new(CuratorService::new(
            recommender,
        )))
        .add_service(HealthServer::new(HealthService))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    info!("curatord stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
