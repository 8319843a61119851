//! Dispatch errors and their HTTP mapping.
//!
//! # Design Decisions
//! - Body decoding failures are the client's fault: 400 with an empty body
//! - Everything else is left to the host's fault boundary, which here is the
//!   `IntoResponse` impl: axum's own rejection response for body reads,
//!   500 for the rest

use axum::body::Body;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::error::Category;
use thiserror::Error;

use crate::mediator::MediatorError;

/// Errors that end a single dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The matched route carries no endpoint metadata.
    #[error("Matched route has no endpoint metadata")]
    MissingMetadata,

    /// The body is not valid JSON.
    #[error("Malformed request body: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    /// The body is valid JSON but does not fit the request type.
    #[error("Request body does not match {request_type}: {source}")]
    TypeCoercion {
        request_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The body could not be read.
    #[error("Failed to read request body: {0}")]
    Body(#[from] BytesRejection),

    /// The mediator or the handler failed.
    #[error(transparent)]
    Mediator(#[from] MediatorError),

    /// The reply could not be encoded.
    #[error("Failed to serialize response: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl DispatchError {
    /// Classify a body decoding error for `request_type`.
    pub fn decode(request_type: &'static str, err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::TypeCoercion {
                request_type,
                source: err,
            },
            Category::Syntax | Category::Eof | Category::Io => Self::MalformedRequest(err),
        }
    }

    /// Status code this error turns into.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) | Self::TypeCoercion { .. } => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::MissingMetadata | Self::Mediator(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match self {
            Self::MalformedRequest(_) | Self::TypeCoercion { .. } => {
                tracing::warn!(error = %self, "Rejected request body");
                let mut response = Response::new(Body::empty());
                *response.status_mut() = StatusCode::BAD_REQUEST;
                response
            }
            Self::Body(rejection) => {
                tracing::warn!(error = %rejection, "Failed to read request body");
                rejection.into_response()
            }
            Self::MissingMetadata | Self::Mediator(_) | Self::Serialization(_) => {
                tracing::error!(error = %self, "Dispatch failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
