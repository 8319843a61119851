//! Handler descriptors: what the dispatcher needs to know about a handler.

use std::any::{Any, TypeId};
use std::fmt;

use serde::de::DeserializeOwned;

use crate::http::context::{HttpContext, HttpContextAware};
use crate::mediator::{BoxedRequest, RequestHandler};

/// Identity and name of a Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment without generic arguments.
    ///
    /// `app::orders::CreateOrder` and `app::Envelope<app::Item>` become
    /// `CreateOrder` and `Envelope`.
    pub fn bare_name(&self) -> &'static str {
        bare_type_name(self.name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) fn bare_type_name(name: &str) -> &str {
    let path = name.split('<').next().unwrap_or(name);
    path.rsplit("::").next().unwrap_or(path)
}

type MakeDefault = fn() -> BoxedRequest;
type Decode = fn(&[u8]) -> serde_json::Result<BoxedRequest>;
type InjectContext = fn(&mut (dyn Any + Send), HttpContext);

/// Everything derived from one `RequestHandler` implementation.
///
/// The function pointers stand in for runtime reflection: they are
/// monomorphised for the handler's request type when the handler is
/// registered in the catalog.
#[derive(Clone)]
pub struct HandlerDescriptor {
    handler_type: TypeInfo,
    request_type: TypeInfo,
    response_type: TypeInfo,
    make_default: MakeDefault,
    decode: Decode,
    http_context: Option<InjectContext>,
}

impl HandlerDescriptor {
    /// Describe handler `H`.
    pub fn of<H: RequestHandler>() -> Self {
        Self {
            handler_type: TypeInfo::of::<H>(),
            request_type: TypeInfo::of::<H::Request>(),
            response_type: TypeInfo::of::<H::Response>(),
            make_default: make_default::<H::Request>,
            decode: decode::<H::Request>,
            http_context: None,
        }
    }

    /// Describe handler `H` whose request wants the HTTP exchange injected.
    pub fn of_http_aware<H>() -> Self
    where
        H: RequestHandler,
        H::Request: HttpContextAware,
    {
        Self {
            http_context: Some(inject_context::<H::Request>),
            ..Self::of::<H>()
        }
    }

    pub fn handler_type(&self) -> TypeInfo {
        self.handler_type
    }

    pub fn request_type(&self) -> TypeInfo {
        self.request_type
    }

    pub fn response_type(&self) -> TypeInfo {
        self.response_type
    }

    /// A default-valued request, used for empty bodies.
    pub fn default_request(&self) -> BoxedRequest {
        (self.make_default)()
    }

    /// Decode a JSON body into the request type.
    pub fn decode_request(&self, body: &[u8]) -> serde_json::Result<BoxedRequest> {
        (self.decode)(body)
    }

    pub fn is_http_aware(&self) -> bool {
        self.http_context.is_some()
    }

    /// Hand the exchange to the request if its type asked for it.
    pub fn inject_context(&self, request: &mut BoxedRequest, context: HttpContext) {
        if let Some(inject) = self.http_context {
            inject(request.as_mut(), context);
        }
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("handler_type", &self.handler_type.name)
            .field("request_type", &self.request_type.name)
            .field("response_type", &self.response_type.name)
            .field("http_aware", &self.http_context.is_some())
            .finish()
    }
}

fn make_default<R: Default + Send + 'static>() -> BoxedRequest {
    Box::new(R::default())
}

fn decode<R: DeserializeOwned + Send + 'static>(body: &[u8]) -> serde_json::Result<BoxedRequest> {
    let request: R = serde_json::from_slice(body)?;
    Ok(Box::new(request))
}

fn inject_context<R: HttpContextAware + 'static>(request: &mut (dyn Any + Send), context: HttpContext) {
    if let Some(request) = request.downcast_mut::<R>() {
        request.set_http_context(context);
    }
}
