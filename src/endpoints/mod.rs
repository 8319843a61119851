//! Endpoint derivation subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     HandlerCatalog::register::<H>() (catalog.rs)
//!         → HandlerDescriptor (descriptor.rs) + annotations (annotation.rs)
//!     EndpointOptions.handler_types
//!         → EndpointDeriver::derive_and_register (deriver.rs)
//!         → templates synthesized / prefixed (template.rs)
//!         → RouteTable of EndpointMetadata (table.rs)
//!         → http::server turns the table into Axum routes
//! ```
//!
//! # Design Decisions
//! - Static registration instead of runtime reflection
//! - Route table is immutable once the server is built
//! - Derivation is all-or-nothing per call

pub mod annotation;
pub mod catalog;
pub mod deriver;
pub mod descriptor;
pub mod error;
pub mod table;
pub mod template;

pub use annotation::{Annotation, HttpMethodAnnotation};
pub use catalog::{CatalogEntry, HandlerCatalog};
pub use deriver::EndpointDeriver;
pub use descriptor::{HandlerDescriptor, TypeInfo};
pub use error::ConfigurationError;
pub use table::{EndpointMetadata, RouteBinding, RouteTable};
