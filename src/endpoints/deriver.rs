//! Endpoint derivation: handler types → route table entries.
//!
//! # Responsibilities
//! - Resolve every configured handler identifier in the catalog
//! - Turn each handler's HTTP method annotations into route bindings
//! - Apply the configured base path
//! - Attach descriptor and forwarded annotations to every route
//!
//! # Design Decisions
//! - All identifiers are resolved before anything is registered, so a bad
//!   entry leaves the route table untouched
//! - No deduplication: deriving twice registers every route twice

use std::sync::Arc;

use axum::http::Method;
use axum::routing::MethodFilter;

use crate::endpoints::catalog::{CatalogEntry, HandlerCatalog};
use crate::endpoints::error::ConfigurationError;
use crate::endpoints::table::{EndpointMetadata, RouteBinding, RouteTable};
use crate::endpoints::template;

/// Derives routes for handler types found in a catalog.
#[derive(Debug, Clone, Copy)]
pub struct EndpointDeriver<'a> {
    catalog: &'a HandlerCatalog,
    base_path: Option<&'a str>,
}

impl<'a> EndpointDeriver<'a> {
    pub fn new(catalog: &'a HandlerCatalog) -> Self {
        Self {
            catalog,
            base_path: None,
        }
    }

    /// Prefix every derived template with `base_path`.
    pub fn with_base_path(mut self, base_path: Option<&'a str>) -> Self {
        self.base_path = base_path;
        self
    }

    /// Derive routes for `handler_types` and append them to `table`.
    ///
    /// Returns the number of routes registered.
    pub fn derive_and_register<S: AsRef<str>>(
        &self,
        handler_types: &[S],
        table: &mut RouteTable,
    ) -> Result<usize, ConfigurationError> {
        let mut derived = Vec::new();
        for name in handler_types {
            let entry = self.catalog.resolve(name.as_ref())?;
            derived.extend(self.derive(entry)?);
        }

        let count = derived.len();
        for metadata in derived {
            tracing::info!(
                route = %metadata.binding().label(),
                handler = metadata.descriptor().handler_type().name(),
                request = metadata.descriptor().request_type().bare_name(),
                response = metadata.descriptor().response_type().bare_name(),
                "Registered endpoint"
            );
            table.push(metadata);
        }

        Ok(count)
    }

    /// Routes for one handler, without registering them.
    pub fn derive(&self, entry: &CatalogEntry) -> Result<Vec<EndpointMetadata>, ConfigurationError> {
        let descriptor = &entry.descriptor;
        let handler_name = descriptor.handler_type().name();
        let default_template = template::default_template(&descriptor.request_type());

        let bindings = if entry.http_methods.is_empty() {
            vec![RouteBinding::new(vec![Method::POST], default_template)]
        } else {
            entry
                .http_methods
                .iter()
                .map(|annotation| {
                    if annotation.methods().is_empty() {
                        return Err(ConfigurationError::EmptyMethodSet(handler_name.to_string()));
                    }
                    for method in annotation.methods() {
                        validate_method(handler_name, method)?;
                    }
                    let template = annotation
                        .template()
                        .map(template::normalize)
                        .unwrap_or_else(|| default_template.clone());
                    Ok(RouteBinding::new(annotation.methods().to_vec(), template))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(bindings
            .into_iter()
            .map(|binding| {
                let template = template::apply_base_path(self.base_path, binding.template());
                EndpointMetadata::new(
                    RouteBinding::new(binding.methods().to_vec(), template),
                    Arc::clone(descriptor),
                    entry.annotations.clone(),
                )
            })
            .collect())
    }
}

fn validate_method(handler_name: &str, method: &Method) -> Result<(), ConfigurationError> {
    MethodFilter::try_from(method.clone())
        .map(|_| ())
        .map_err(|_| ConfigurationError::UnsupportedMethod {
            handler_type: handler_name.to_string(),
            method: method.to_string(),
        })
}
