//! The request handler contract.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower::BoxError;

use crate::endpoints::annotation::{Annotation, HttpMethodAnnotation};

/// A unit that accepts one request type and produces one response type.
///
/// The two associated types are what the endpoint deriver reads to build a
/// route's descriptor. `Request` must be decodable from JSON and have a
/// default value (used when the HTTP body is empty).
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Default, Deserialize)]
/// struct CreateOrder { sku: String, quantity: u32 }
///
/// #[derive(Debug, Serialize)]
/// struct OrderCreated { id: u64 }
///
/// struct CreateOrderHandler;
///
/// #[async_trait]
/// impl RequestHandler for CreateOrderHandler {
///     type Request = CreateOrder;
///     type Response = OrderCreated;
///
///     async fn handle(&self, request: CreateOrder, _cancel: CancellationToken)
///         -> Result<OrderCreated, BoxError>
///     {
///         Ok(OrderCreated { id: 1 })
///     }
///
///     fn http_methods() -> Vec<HttpMethodAnnotation> {
///         vec![HttpMethodAnnotation::post("/orders")]
///     }
/// }
/// ```
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// Input message type.
    type Request: DeserializeOwned + Default + Send + 'static;

    /// Output message type.
    type Response: Serialize + Send + 'static;

    /// Process one request.
    ///
    /// `cancel` fires when the HTTP exchange is dropped, e.g. on client
    /// disconnect or request timeout.
    async fn handle(
        &self,
        request: Self::Request,
        cancel: CancellationToken,
    ) -> Result<Self::Response, BoxError>;

    /// HTTP method annotations on this handler.
    ///
    /// Empty means a single `POST /<RequestBareName>` route.
    fn http_methods() -> Vec<HttpMethodAnnotation>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Extra metadata forwarded to every route derived from this handler.
    fn annotations() -> Vec<Annotation>
    where
        Self: Sized,
    {
        Vec::new()
    }
}
