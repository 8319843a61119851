//! Mediator boundary types and error definitions.

use std::any::Any;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower::BoxError;

use crate::mediator::reply::Reply;

/// A request object crossing the mediator boundary.
pub type BoxedRequest = Box<dyn Any + Send>;

/// Routes a request object to its handler and returns the handler's reply.
#[async_trait]
pub trait Mediator: Send + Sync {
    /// Send one request and await its reply.
    async fn send(
        &self,
        request: BoxedRequest,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Reply>, MediatorError>;
}

/// Errors that can occur while sending a request through the mediator.
#[derive(Debug, Error)]
pub enum MediatorError {
    /// No handler is registered for the request's type.
    #[error("No handler registered for request type {0}")]
    NoHandler(String),

    /// The request object was not of the type the handler expects.
    #[error("Handler for {expected} received a request of another type")]
    RequestMismatch { expected: &'static str },

    /// The handler gave up because the exchange was cancelled.
    #[error("Request cancelled")]
    Cancelled,

    /// The handler itself failed.
    #[error("Handler failed: {0}")]
    Handler(#[source] BoxError),
}
