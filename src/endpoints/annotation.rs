//! Handler-declared route annotations.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

/// Binds a handler to one or more HTTP methods, optionally at a template.
///
/// An empty or missing template means `/<RequestBareName>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMethodAnnotation {
    methods: Vec<Method>,
    template: Option<String>,
}

impl HttpMethodAnnotation {
    /// Annotation for an arbitrary method set.
    pub fn new(methods: impl IntoIterator<Item = Method>, template: Option<&str>) -> Self {
        Self {
            methods: methods.into_iter().collect(),
            template: template.map(str::to_string),
        }
    }

    pub fn get(template: &str) -> Self {
        Self::new([Method::GET], Some(template))
    }

    pub fn post(template: &str) -> Self {
        Self::new([Method::POST], Some(template))
    }

    pub fn put(template: &str) -> Self {
        Self::new([Method::PUT], Some(template))
    }

    pub fn patch(template: &str) -> Self {
        Self::new([Method::PATCH], Some(template))
    }

    pub fn delete(template: &str) -> Self {
        Self::new([Method::DELETE], Some(template))
    }

    /// Methods this annotation binds.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Template fragment, `None` when absent or blank.
    pub fn template(&self) -> Option<&str> {
        self.template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Opaque metadata forwarded onto every route derived from a handler.
///
/// The core never looks inside; middleware downcasts to the type it knows.
#[derive(Clone)]
pub struct Annotation {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Annotation {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Borrow the value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Annotation").field(&self.type_name).finish()
    }
}
