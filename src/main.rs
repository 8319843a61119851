//! Mediator gateway (v1)
//!
//! Serves in-process request handlers over HTTP, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────── startup ────────────────────────┐
//!                 │  config ──▶ handler_types ──▶ EndpointDeriver ──▶ routes │
//!                 │                 ▲                                        │
//!                 │          HandlerCatalog                                 │
//!                 └─────────────────────────────────────────────────────────┘
//!
//!   Client ──▶ listener ──▶ axum router ──▶ dispatch ──▶ Mediator ──▶ handler
//!   Client ◀──────────── JSON reply ◀──────── dispatch ◀──────────────┘
//! ```
//!
//! The binary ships two demonstration handlers, `PingHandler` and
//! `EchoHandler`. Embedders register their own in a `HandlerCatalog` and a
//! mediator and call `lifecycle::startup::run`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower::BoxError;

use mediator_gateway::config::{load_config, validated, EndpointOptions, GatewayConfig};
use mediator_gateway::endpoints::{HandlerCatalog, HttpMethodAnnotation};
use mediator_gateway::http::{HttpContext, HttpContextAware, HttpServer};
use mediator_gateway::lifecycle::{signals, startup, Shutdown};
use mediator_gateway::mediator::{HandlerMediator, RequestHandler};
use mediator_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "mediator-gateway")]
#[command(about = "Expose mediator request handlers as HTTP endpoints", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Print the derived routes and exit.
    #[arg(long)]
    print_routes: bool,
}

/// Health-style ping.
#[derive(Debug, Default, Deserialize)]
struct Ping {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct Pong {
    message: String,
}

struct PingHandler;

#[async_trait]
impl RequestHandler for PingHandler {
    type Request = Ping;
    type Response = Pong;

    async fn handle(&self, request: Ping, _cancel: CancellationToken) -> Result<Pong, BoxError> {
        Ok(Pong {
            message: request.message.unwrap_or_else(|| "pong".to_string()),
        })
    }

    fn http_methods() -> Vec<HttpMethodAnnotation> {
        vec![
            HttpMethodAnnotation::get("/ping"),
            HttpMethodAnnotation::post("/ping"),
        ]
    }
}

/// Echoes the body back along with what the caller looked like.
#[derive(Debug, Default, Deserialize)]
struct Echo {
    #[serde(default)]
    text: String,
    #[serde(skip)]
    context: Option<HttpContext>,
}

impl HttpContextAware for Echo {
    fn set_http_context(&mut self, context: HttpContext) {
        self.context = Some(context);
    }
}

#[derive(Debug, Serialize)]
struct Echoed {
    text: String,
    request_id: Option<String>,
    client: Option<String>,
}

struct EchoHandler;

#[async_trait]
impl RequestHandler for EchoHandler {
    type Request = Echo;
    type Response = Echoed;

    async fn handle(&self, request: Echo, _cancel: CancellationToken) -> Result<Echoed, BoxError> {
        let context = request.context.as_ref();
        Ok(Echoed {
            text: request.text,
            request_id: context.and_then(|c| c.request_id()).map(str::to_string),
            client: context.and_then(|c| c.remote_addr()).map(|a| a.to_string()),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig {
            endpoints: EndpointOptions {
                base_path: None,
                handler_types: vec!["PingHandler".into(), "EchoHandler".into()],
            },
            ..GatewayConfig::default()
        },
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    let config = validated(config)?;

    logging::init_logging(&config.observability.log_level)?;
    tracing::info!("mediator-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let mut catalog = HandlerCatalog::new();
    catalog
        .register::<PingHandler>()
        .register_http_aware::<EchoHandler>();

    if cli.print_routes {
        let routes = HttpServer::derive_routes(&config, &catalog)?;
        for route in routes.iter() {
            println!(
                "{:<24} {} -> {}",
                route.binding().label(),
                route.descriptor().request_type().bare_name(),
                route.descriptor().response_type().bare_name()
            );
        }
        return Ok(());
    }

    let mut mediator = HandlerMediator::new();
    mediator
        .register(Arc::new(PingHandler))
        .register(Arc::new(EchoHandler));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        handlers = config.endpoints.handler_types.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    startup::run(config, &catalog, Arc::new(mediator), shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
