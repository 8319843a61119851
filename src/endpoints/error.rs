//! Startup configuration errors.

use thiserror::Error;

/// Fatal problems found while deriving endpoints. Startup must abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The identifier does not name a registered `RequestHandler`.
    #[error("Type '{0}' does not implement RequestHandler<Request, Response>")]
    NotARequestHandler(String),

    /// A bare name matched handlers from several modules.
    #[error("Handler type '{name}' is ambiguous: {}", .candidates.join(", "))]
    AmbiguousHandler {
        name: String,
        candidates: Vec<String>,
    },

    /// An HTTP method annotation named no methods.
    #[error("Handler '{0}' has an HTTP method annotation without methods")]
    EmptyMethodSet(String),

    /// The template cannot be routed, or conflicts with an earlier one.
    #[error("Handler '{handler_type}' has unusable route template '{template}': {reason}")]
    InvalidTemplate {
        handler_type: String,
        template: String,
        reason: String,
    },

    /// The router cannot bind this method.
    #[error("Handler '{handler_type}' uses unsupported HTTP method {method}")]
    UnsupportedMethod {
        handler_type: String,
        method: String,
    },
}
