//! Mediator gateway library.
//!
//! Exposes in-process request handlers as HTTP endpoints: routes are derived
//! from handler types at startup, and every matched request is decoded,
//! sent through a mediator and answered with the handler's JSON reply.

pub mod config;
pub mod endpoints;
pub mod http;
pub mod lifecycle;
pub mod mediator;
pub mod observability;

pub use config::GatewayConfig;
pub use endpoints::{ConfigurationError, HandlerCatalog, HttpMethodAnnotation};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use mediator::{HandlerMediator, Mediator, RequestHandler};
