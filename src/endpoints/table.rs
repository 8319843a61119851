//! The route table filled by the deriver.

use std::sync::Arc;

use axum::http::Method;

use crate::endpoints::annotation::Annotation;
use crate::endpoints::descriptor::HandlerDescriptor;

/// One method set bound at one URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBinding {
    methods: Vec<Method>,
    template: String,
}

impl RouteBinding {
    pub fn new(methods: Vec<Method>, template: impl Into<String>) -> Self {
        Self {
            methods,
            template: template.into(),
        }
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// `GET|HEAD /orders/{id}` style label for logs.
    pub fn label(&self) -> String {
        let methods: Vec<&str> = self.methods.iter().map(Method::as_str).collect();
        format!("{} {}", methods.join("|"), self.template)
    }
}

/// Metadata attached to a registered route and read back by the dispatcher.
#[derive(Debug, Clone)]
pub struct EndpointMetadata {
    binding: RouteBinding,
    descriptor: Arc<HandlerDescriptor>,
    annotations: Vec<Annotation>,
}

impl EndpointMetadata {
    pub fn new(
        binding: RouteBinding,
        descriptor: Arc<HandlerDescriptor>,
        annotations: Vec<Annotation>,
    ) -> Self {
        Self {
            binding,
            descriptor,
            annotations,
        }
    }

    pub fn binding(&self) -> &RouteBinding {
        &self.binding
    }

    pub fn descriptor(&self) -> &HandlerDescriptor {
        &self.descriptor
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// First forwarded annotation of type `T`.
    pub fn annotation<T: 'static>(&self) -> Option<&T> {
        self.annotations.iter().find_map(|a| a.downcast_ref::<T>())
    }

    /// Name used for logs and metric labels.
    pub fn endpoint_name(&self) -> &'static str {
        self.descriptor.handler_type().bare_name()
    }
}

/// Ordered list of registered endpoints.
///
/// Registration order is preserved and duplicates are kept: deriving the
/// same handler list twice yields every route twice.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<Arc<EndpointMetadata>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, metadata: EndpointMetadata) {
        self.entries.push(Arc::new(metadata));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EndpointMetadata>> {
        self.entries.iter()
    }

    /// Routes derived from the handler with bare name `handler`.
    pub fn for_handler<'a>(
        &'a self,
        handler: &'a str,
    ) -> impl Iterator<Item = &'a Arc<EndpointMetadata>> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.descriptor().handler_type().bare_name() == handler)
    }
}
