//! The single request entry point shared by every derived route.
//!
//! # Responsibilities
//! - Read the endpoint metadata attached to the matched route
//! - Build the request object from the body (or its default)
//! - Inject the HTTP exchange into requests that asked for it
//! - Send through the mediator and write the reply as JSON
//!
//! # Design Decisions
//! - Stateless per call: only the mediator and route metadata are shared,
//!   both read-only
//! - Dropping the handler future (client gone) cancels the token handed to
//!   the mediator
//! - No retries, no timeout of its own

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, State},
    http::{header, HeaderValue, Request},
    response::Response,
};
use tokio_util::sync::CancellationToken;

use crate::endpoints::EndpointMetadata;
use crate::http::context::HttpContext;
use crate::http::error::DispatchError;
use crate::mediator::Mediator;
use crate::observability::metrics;

/// Media type of every request and response body.
pub const APPLICATION_JSON: &str = "application/json";

/// Shared state for the dispatcher.
#[derive(Clone)]
pub struct DispatchState {
    pub mediator: Arc<dyn Mediator>,
}

impl DispatchState {
    pub fn new(mediator: Arc<dyn Mediator>) -> Self {
        Self { mediator }
    }
}

/// Axum handler wired to every derived route.
pub async fn dispatch(
    State(state): State<DispatchState>,
    request: Request<Body>,
) -> Result<Response, DispatchError> {
    let start_time = Instant::now();
    let metadata = request
        .extensions()
        .get::<Arc<EndpointMetadata>>()
        .cloned()
        .ok_or(DispatchError::MissingMetadata)?;

    let result = dispatch_to(&state, &metadata, request).await;

    let status = match &result {
        Ok(response) => response.status(),
        Err(e) => e.status(),
    };
    metrics::record_dispatch(metadata.endpoint_name(), status.as_u16(), start_time);

    result
}

async fn dispatch_to(
    state: &DispatchState,
    metadata: &EndpointMetadata,
    request: Request<Body>,
) -> Result<Response, DispatchError> {
    let descriptor = metadata.descriptor();
    let request_type = descriptor.request_type();

    let context = descriptor
        .is_http_aware()
        .then(|| HttpContext::from_request(&request));

    let body = Bytes::from_request(request, state).await?;

    let mut message = if body.is_empty() {
        tracing::debug!(request_type = request_type.name(), "Empty body, using default request");
        descriptor.default_request()
    } else {
        descriptor
            .decode_request(&body)
            .map_err(|e| DispatchError::decode(request_type.name(), e))?
    };

    if let Some(context) = &context {
        descriptor.inject_context(&mut message, context.clone());
    }

    tracing::debug!(
        endpoint = metadata.endpoint_name(),
        route = %metadata.binding().label(),
        request_type = request_type.name(),
        "Sending request to mediator"
    );

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let sent = state.mediator.send(message, cancel).await;
    guard.disarm();
    let reply = sent?;

    let bytes = reply.to_json().map_err(DispatchError::Serialization)?;

    let mut response = Response::new(Body::from(bytes));
    if let Some(context) = context {
        response.headers_mut().extend(context.take_response_headers());
    }
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

    Ok(response)
}
