//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, one route per binding)
//!     → request.rs (request ID)
//!     → dispatch.rs (metadata → request object → mediator → JSON reply)
//!     → context.rs (exchange injected into HTTP-aware requests)
//!     → error.rs (400 for bad bodies, host fault mapping for the rest)
//!     → Send to client
//! ```

pub mod context;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod server;

pub use context::{HttpContext, HttpContextAware};
pub use dispatch::{dispatch, DispatchState, APPLICATION_JSON};
pub use error::DispatchError;
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
