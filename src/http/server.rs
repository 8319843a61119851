//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Derive endpoints from configuration and the handler catalog
//! - Turn the route table into an Axum Router, one dispatch route per binding
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Serve with graceful shutdown

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{Method, StatusCode},
    routing::{get, on, MethodFilter, MethodRouter},
    Extension, Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::endpoints::template::TemplateSet;
use crate::endpoints::{ConfigurationError, EndpointDeriver, HandlerCatalog, RouteTable};
use crate::http::dispatch::{dispatch, DispatchState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::Shutdown;
use crate::mediator::Mediator;
use crate::observability::metrics;

/// Liveness probe path, registered unless a derived route already uses it.
pub const HEALTH_PATH: &str = "/health";

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub routes: usize,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    routes: RouteTable,
}

impl HttpServer {
    /// Derive endpoints and build the router.
    ///
    /// Fails if any configured handler type is not in `catalog`, or if a
    /// derived template cannot be routed.
    pub fn new(
        config: GatewayConfig,
        catalog: &HandlerCatalog,
        mediator: Arc<dyn Mediator>,
    ) -> Result<Self, ConfigurationError> {
        let routes = Self::derive_routes(&config, catalog)?;
        metrics::record_routes(routes.len());

        let router = Self::build_router(&config, &routes, DispatchState::new(mediator))?;
        Ok(Self {
            router,
            config,
            routes,
        })
    }

    /// Run the endpoint deriver over the configured handler list.
    pub fn derive_routes(
        config: &GatewayConfig,
        catalog: &HandlerCatalog,
    ) -> Result<RouteTable, ConfigurationError> {
        let mut routes = RouteTable::new();
        EndpointDeriver::new(catalog)
            .with_base_path(config.endpoints.base_path())
            .derive_and_register(&config.endpoints.handler_types, &mut routes)?;
        Ok(routes)
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &GatewayConfig,
        routes: &RouteTable,
        state: DispatchState,
    ) -> Result<Router, ConfigurationError> {
        let mut accepted = TemplateSet::new();
        let mut bound: HashSet<(String, Method)> = HashSet::new();
        let mut templates: Vec<(String, Vec<MethodRouter<DispatchState>>)> = Vec::new();

        for metadata in routes.iter() {
            let template = metadata.binding().template();
            accepted.insert(metadata.descriptor().handler_type().name(), template)?;

            let mut filter: Option<MethodFilter> = None;

            for method in metadata.binding().methods() {
                if !bound.insert((template.to_string(), method.clone())) {
                    tracing::warn!(
                        method = %method,
                        template = %template,
                        handler = metadata.descriptor().handler_type().name(),
                        "Route already bound, skipping duplicate"
                    );
                    continue;
                }
                // The deriver rejects methods without a filter.
                if let Ok(f) = MethodFilter::try_from(method.clone()) {
                    filter = Some(filter.map_or(f, |acc| acc.or(f)));
                }
            }

            let Some(filter) = filter else { continue };
            let method_router = on(filter, dispatch).layer(Extension(Arc::clone(metadata)));

            match templates.iter_mut().find(|(t, _)| t == template) {
                Some((_, routers)) => routers.push(method_router),
                None => templates.push((template.to_string(), vec![method_router])),
            }
        }

        let mut router = Router::new();
        for (template, routers) in templates {
            if let Some(method_router) = routers.into_iter().reduce(MethodRouter::merge) {
                router = router.route(&template, method_router);
            }
        }

        if !bound.contains(&(HEALTH_PATH.to_string(), Method::GET)) {
            match accepted.insert("health", HEALTH_PATH) {
                Ok(()) => {
                    let route_count = routes.len();
                    router = router.route(
                        HEALTH_PATH,
                        get(move || async move {
                            Json(HealthStatus {
                                version: env!("CARGO_PKG_VERSION"),
                                status: "ok",
                                routes: route_count,
                            })
                        }),
                    );
                }
                Err(e) => tracing::warn!(error = %e, "Skipping health route"),
            }
        }

        Ok(router
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer()))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.len(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the router, e.g. for driving it in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The derived route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
