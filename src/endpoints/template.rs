//! Route template synthesis.
//!
//! # Design Decisions
//! - Templates are plain strings in the router's own path syntax; nothing
//!   here parses parameters
//! - Every produced template starts with exactly one `/`
//! - Templates are checked against axum's matcher before the router is
//!   built, so a bad one is a startup error instead of a panic

use std::collections::HashSet;

use crate::endpoints::descriptor::TypeInfo;
use crate::endpoints::error::ConfigurationError;

/// `/` + the request type's bare name.
pub fn default_template(request_type: &TypeInfo) -> String {
    format!("/{}", request_type.bare_name())
}

/// Ensure a leading `/` on an annotation-supplied template.
pub fn normalize(template: &str) -> String {
    if template.starts_with('/') {
        template.to_string()
    } else {
        format!("/{}", template)
    }
}

/// Prefix `template` with `base_path`, collapsing the slashes between them.
///
/// An absent or empty base path leaves the template unchanged. A base path
/// without a leading `/` gets one.
pub fn apply_base_path(base_path: Option<&str>, template: &str) -> String {
    match base_path {
        Some(base) if !base.is_empty() => {
            let base = base.trim_end_matches('/');
            let separator = if base.starts_with('/') || base.is_empty() { "" } else { "/" };
            format!("{}{}/{}", separator, base, template.trim_start_matches('/'))
        }
        _ => template.to_string(),
    }
}

/// Templates accepted for one router.
///
/// Uses the same `matchit` matcher as axum, which returns an error where
/// `Router::route` would panic.
pub struct TemplateSet {
    matcher: matchit::Router<()>,
    accepted: HashSet<String>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self {
            matcher: matchit::Router::new(),
            accepted: HashSet::new(),
        }
    }

    /// Accept `template` for `handler_type`. A template seen before is
    /// accepted again without a second check.
    pub fn insert(&mut self, handler_type: &str, template: &str) -> Result<(), ConfigurationError> {
        if self.accepted.contains(template) {
            return Ok(());
        }

        let invalid = |reason: String| ConfigurationError::InvalidTemplate {
            handler_type: handler_type.to_string(),
            template: template.to_string(),
            reason,
        };

        if !template.starts_with('/') {
            return Err(invalid("must start with '/'".to_string()));
        }
        // axum 0.8 rejects the pre-0.8 capture syntax.
        if let Some(segment) = template
            .split('/')
            .find(|s| s.starts_with(':') || s.starts_with('*'))
        {
            return Err(invalid(format!(
                "segment '{}' uses ':'/'*' captures, write '{{name}}' or '{{*name}}'",
                segment
            )));
        }

        self.matcher
            .insert(template, ())
            .map_err(|e| invalid(e.to_string()))?;
        self.accepted.insert(template.to_string());
        Ok(())
    }

    pub fn contains(&self, template: &str) -> bool {
        self.accepted.contains(template)
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::new()
    }
}
