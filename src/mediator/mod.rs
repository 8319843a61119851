//! In-process mediator subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher (http/dispatch.rs)
//!     → BoxedRequest + CancellationToken
//!     → Mediator::send (types.rs)
//!     → in_process.rs (look up handler by request TypeId, downcast)
//!     → RequestHandler::handle (handler.rs)
//!     → Box<dyn Reply> (reply.rs)
//!     → back to the dispatcher for serialization
//! ```
//!
//! # Design Decisions
//! - The dispatcher only sees the `Mediator` trait; any other implementation
//!   (with behaviors, DI, remoting) can be swapped in
//! - Requests cross the boundary type-erased as `Box<dyn Any + Send>`
//! - Replies carry their own serializer, so a handler can return a more
//!   specific type than it declares

pub mod handler;
pub mod in_process;
pub mod reply;
pub mod types;

pub use handler::RequestHandler;
pub use in_process::HandlerMediator;
pub use reply::Reply;
pub use types::{BoxedRequest, Mediator, MediatorError};
