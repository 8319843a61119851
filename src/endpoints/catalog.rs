//! Explicit registration table of handler types.
//!
//! # Responsibilities
//! - Record, per handler type, its descriptor and declared annotations
//! - Resolve the identifiers listed in configuration to those records
//!
//! # Design Decisions
//! - Registration is explicit and static: a handler is only routable if the
//!   embedding application registered it here
//! - Lookup accepts the fully qualified type name or the bare name; a bare
//!   name shared by several handlers must be written out in full

use std::collections::HashMap;
use std::sync::Arc;

use crate::endpoints::annotation::{Annotation, HttpMethodAnnotation};
use crate::endpoints::descriptor::HandlerDescriptor;
use crate::endpoints::error::ConfigurationError;
use crate::http::context::HttpContextAware;
use crate::mediator::RequestHandler;

/// What the catalog knows about one handler type.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub descriptor: Arc<HandlerDescriptor>,
    pub http_methods: Vec<HttpMethodAnnotation>,
    pub annotations: Vec<Annotation>,
}

/// Handler types known to the application.
#[derive(Debug, Default)]
pub struct HandlerCatalog {
    entries: Vec<CatalogEntry>,
    by_full_name: HashMap<&'static str, usize>,
    by_bare_name: HashMap<&'static str, Vec<usize>>,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register handler type `H`.
    pub fn register<H: RequestHandler>(&mut self) -> &mut Self {
        self.insert(HandlerDescriptor::of::<H>(), H::http_methods(), H::annotations())
    }

    /// Register handler type `H`, whose request receives the HTTP exchange.
    pub fn register_http_aware<H>(&mut self) -> &mut Self
    where
        H: RequestHandler,
        H::Request: HttpContextAware,
    {
        self.insert(
            HandlerDescriptor::of_http_aware::<H>(),
            H::http_methods(),
            H::annotations(),
        )
    }

    fn insert(
        &mut self,
        descriptor: HandlerDescriptor,
        http_methods: Vec<HttpMethodAnnotation>,
        annotations: Vec<Annotation>,
    ) -> &mut Self {
        let handler_type = descriptor.handler_type();
        if self.by_full_name.contains_key(handler_type.name()) {
            tracing::debug!(handler = handler_type.name(), "Handler already in catalog");
            return self;
        }

        let index = self.entries.len();
        self.entries.push(CatalogEntry {
            descriptor: Arc::new(descriptor),
            http_methods,
            annotations,
        });
        self.by_full_name.insert(handler_type.name(), index);
        self.by_bare_name
            .entry(handler_type.bare_name())
            .or_default()
            .push(index);
        self
    }

    /// Look up a handler by full or bare type name.
    pub fn resolve(&self, name: &str) -> Result<&CatalogEntry, ConfigurationError> {
        let name = name.trim();
        if let Some(&index) = self.by_full_name.get(name) {
            return Ok(&self.entries[index]);
        }

        match self.by_bare_name.get(name).map(Vec::as_slice) {
            Some([index]) => Ok(&self.entries[*index]),
            Some(indices) if !indices.is_empty() => Err(ConfigurationError::AmbiguousHandler {
                name: name.to_string(),
                candidates: indices
                    .iter()
                    .map(|&i| self.entries[i].descriptor.handler_type().name().to_string())
                    .collect(),
            }),
            _ => Err(ConfigurationError::NotARequestHandler(name.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full names of every registered handler, in registration order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .map(|e| e.descriptor.handler_type().name())
            .collect()
    }
}
