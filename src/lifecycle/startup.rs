//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Derive endpoints (fatal on configuration errors)
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Endpoints are derived before the listener is bound, so no request can
//!   arrive before the route table is complete

use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::endpoints::{ConfigurationError, HandlerCatalog};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::mediator::Mediator;
use crate::observability::metrics;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Endpoint configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Derive endpoints, bind and serve until `shutdown` is triggered.
pub async fn run(
    config: GatewayConfig,
    catalog: &HandlerCatalog,
    mediator: Arc<dyn Mediator>,
    shutdown: Shutdown,
) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config, catalog, mediator)?;
    tracing::info!(routes = server.routes().len(), "Endpoints derived");

    let address = server.config().listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    server.run(listener, shutdown).await?;
    Ok(())
}
