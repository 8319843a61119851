//! Shared handlers and server builders for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Method, Request, Response};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower::{BoxError, ServiceExt};

use mediator_gateway::config::GatewayConfig;
use mediator_gateway::endpoints::{Annotation, HandlerCatalog, HttpMethodAnnotation};
use mediator_gateway::http::{HttpContext, HttpContextAware, HttpServer};
use mediator_gateway::mediator::{
    BoxedRequest, HandlerMediator, Mediator, MediatorError, Reply, RequestHandler,
};

// --- orders -----------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CreateOrder {
    pub sku: String,
    pub quantity: u8,
}

#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub order_id: u64,
    pub sku: String,
    pub quantity: u8,
}

pub struct CreateOrderHandler;

#[async_trait]
impl RequestHandler for CreateOrderHandler {
    type Request = CreateOrder;
    type Response = OrderCreated;

    async fn handle(&self, request: CreateOrder, _c: CancellationToken) -> Result<OrderCreated, BoxError> {
        Ok(OrderCreated {
            order_id: 1001,
            sku: request.sku,
            quantity: request.quantity,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GetOrder {
    #[serde(default)]
    pub include_lines: bool,
}

#[derive(Debug, Serialize)]
pub struct OrderView {
    pub order_id: u64,
    pub lines: Option<Vec<String>>,
}

/// Marker forwarded to middleware; the gateway never reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiresScope(pub &'static str);

pub struct GetOrderHandler;

#[async_trait]
impl RequestHandler for GetOrderHandler {
    type Request = GetOrder;
    type Response = OrderView;

    async fn handle(&self, request: GetOrder, _c: CancellationToken) -> Result<OrderView, BoxError> {
        Ok(OrderView {
            order_id: 1001,
            lines: request.include_lines.then(|| vec!["A-1".to_string()]),
        })
    }

    fn http_methods() -> Vec<HttpMethodAnnotation> {
        vec![
            HttpMethodAnnotation::get("/orders/{id}"),
            HttpMethodAnnotation::new([Method::PUT, Method::PATCH], None),
        ]
    }

    fn annotations() -> Vec<Annotation> {
        vec![Annotation::new(RequiresScope("orders:read"))]
    }
}

// --- polymorphic replies ----------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct DescribeShape {
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct Circle {
    pub radius: f64,
}

#[derive(Debug, Serialize)]
pub struct Square {
    pub side: f64,
    pub corners: u8,
}

pub struct DescribeShapeHandler;

#[async_trait]
impl RequestHandler for DescribeShapeHandler {
    type Request = DescribeShape;
    type Response = Box<dyn Reply>;

    async fn handle(&self, request: DescribeShape, _c: CancellationToken) -> Result<Box<dyn Reply>, BoxError> {
        match request.kind.as_str() {
            "square" => Ok(Box::new(Square { side: 2.0, corners: 4 })),
            _ => Ok(Box::new(Circle { radius: 1.5 })),
        }
    }
}

// --- HTTP-aware request -----------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct WhoAmI {
    #[serde(skip)]
    pub context: Option<HttpContext>,
}

impl HttpContextAware for WhoAmI {
    fn set_http_context(&mut self, context: HttpContext) {
        self.context = Some(context);
    }
}

#[derive(Debug, Serialize)]
pub struct Identity {
    pub user_agent: Option<String>,
    pub method: String,
    pub client: Option<String>,
}

pub struct WhoAmIHandler;

#[async_trait]
impl RequestHandler for WhoAmIHandler {
    type Request = WhoAmI;
    type Response = Identity;

    async fn handle(&self, request: WhoAmI, _c: CancellationToken) -> Result<Identity, BoxError> {
        let context = request.context.ok_or("no HTTP context")?;
        context.append_response_header(
            HeaderName::from_static("x-handled-by"),
            HeaderValue::from_static("whoami"),
        );
        Ok(Identity {
            user_agent: context.header("user-agent").map(str::to_string),
            method: context.method().to_string(),
            client: context.remote_addr().map(|addr| addr.to_string()),
        })
    }
}

// --- failures ---------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct Explode;

pub struct ExplodeHandler;

#[async_trait]
impl RequestHandler for ExplodeHandler {
    type Request = Explode;
    type Response = ();

    async fn handle(&self, _r: Explode, _c: CancellationToken) -> Result<(), BoxError> {
        Err("inventory service unavailable".into())
    }
}

// --- wiring -----------------------------------------------------------------

/// Mediator wrapper counting how often `send` is reached.
pub struct CountingMediator {
    inner: HandlerMediator,
    pub calls: AtomicUsize,
}

impl CountingMediator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mediator for CountingMediator {
    async fn send(
        &self,
        request: BoxedRequest,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Reply>, MediatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.send(request, cancel).await
    }
}

pub const ALL_HANDLERS: [&str; 5] = [
    "CreateOrderHandler",
    "GetOrderHandler",
    "DescribeShapeHandler",
    "WhoAmIHandler",
    "ExplodeHandler",
];

pub fn catalog() -> HandlerCatalog {
    let mut catalog = HandlerCatalog::new();
    catalog
        .register::<CreateOrderHandler>()
        .register::<GetOrderHandler>()
        .register::<DescribeShapeHandler>()
        .register_http_aware::<WhoAmIHandler>()
        .register::<ExplodeHandler>();
    catalog
}

pub fn mediator() -> Arc<CountingMediator> {
    let mut inner = HandlerMediator::new();
    inner
        .register(Arc::new(CreateOrderHandler))
        .register(Arc::new(GetOrderHandler))
        .register(Arc::new(DescribeShapeHandler))
        .register(Arc::new(WhoAmIHandler))
        .register(Arc::new(ExplodeHandler));
    Arc::new(CountingMediator {
        inner,
        calls: AtomicUsize::new(0),
    })
}

pub fn config(base_path: Option<&str>, handler_types: &[&str]) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.endpoints.base_path = base_path.map(str::to_string);
    config.endpoints.handler_types = handler_types.iter().map(|s| s.to_string()).collect();
    config
}

/// Server with every test handler under `/api`, plus its mediator.
pub fn server() -> (HttpServer, Arc<CountingMediator>) {
    let mediator = mediator();
    let server = HttpServer::new(config(Some("/api"), &ALL_HANDLERS), &catalog(), mediator.clone())
        .expect("valid configuration");
    (server, mediator)
}

pub async fn send(server: &HttpServer, method: &str, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("user-agent", "gateway-tests")
        .body(Body::from(body.to_string()))
        .unwrap();
    server.router().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
