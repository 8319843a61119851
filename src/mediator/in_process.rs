//! Minimal in-process mediator.
//!
//! # Responsibilities
//! - Keep one handler per request type
//! - Downcast the boxed request and call the handler
//! - Box the handler's response as a `Reply`
//!
//! # Design Decisions
//! - No pipeline behaviors or dependency injection: handlers are registered
//!   as ready-made instances
//! - Immutable after construction, shared via `Arc`

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::mediator::handler::RequestHandler;
use crate::mediator::reply::Reply;
use crate::mediator::types::{BoxedRequest, Mediator, MediatorError};

/// Object-safe view of a `RequestHandler`.
#[async_trait]
trait ErasedHandler: Send + Sync {
    async fn handle(
        &self,
        request: BoxedRequest,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Reply>, MediatorError>;
}

struct HandlerAdapter<H> {
    inner: Arc<H>,
}

#[async_trait]
impl<H: RequestHandler> ErasedHandler for HandlerAdapter<H> {
    async fn handle(
        &self,
        request: BoxedRequest,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Reply>, MediatorError> {
        let request = request
            .downcast::<H::Request>()
            .map_err(|_| MediatorError::RequestMismatch {
                expected: std::any::type_name::<H::Request>(),
            })?;

        if cancel.is_cancelled() {
            return Err(MediatorError::Cancelled);
        }

        let response = self
            .inner
            .handle(*request, cancel)
            .await
            .map_err(MediatorError::Handler)?;

        Ok(Box::new(response))
    }
}

/// Mediator that routes each request type to exactly one registered handler.
#[derive(Default)]
pub struct HandlerMediator {
    handlers: HashMap<TypeId, Arc<dyn ErasedHandler>>,
}

impl HandlerMediator {
    /// Create an empty mediator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `H::Request`, replacing any earlier one.
    pub fn register<H: RequestHandler>(&mut self, handler: Arc<H>) -> &mut Self {
        let previous = self.handlers.insert(
            TypeId::of::<H::Request>(),
            Arc::new(HandlerAdapter { inner: handler }),
        );
        if previous.is_some() {
            tracing::warn!(
                request_type = std::any::type_name::<H::Request>(),
                "Replacing previously registered handler"
            );
        }
        self
    }

    /// Number of request types with a handler.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[async_trait]
impl Mediator for HandlerMediator {
    async fn send(
        &self,
        request: BoxedRequest,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Reply>, MediatorError> {
        let type_id = (*request).type_id();
        let handler = self
            .handlers
            .get(&type_id)
            .cloned()
            .ok_or_else(|| MediatorError::NoHandler(format!("{:?}", type_id)))?;

        handler.handle(request, cancel).await
    }
}
