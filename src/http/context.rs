//! HTTP exchange handed to requests that ask for it.
//!
//! # Responsibilities
//! - Snapshot the inbound request line, headers and client address
//! - Collect headers a handler wants added to the response
//!
//! # Design Decisions
//! - Cheap to clone (`Arc` inside), so a request can keep it around
//! - Request side is read-only; the mediator never sees the body stream

use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Uri, Version};

use crate::http::X_REQUEST_ID;

/// Implemented by request types that want access to the HTTP exchange.
///
/// Register the handler with `HandlerCatalog::register_http_aware` for the
/// dispatcher to call this before sending the request to the mediator.
pub trait HttpContextAware {
    fn set_http_context(&mut self, context: HttpContext);
}

struct Exchange {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    remote_addr: Option<SocketAddr>,
    response_headers: Mutex<HeaderMap>,
}

/// The current request/response exchange.
#[derive(Clone)]
pub struct HttpContext {
    inner: Arc<Exchange>,
}

impl HttpContext {
    pub fn new(
        method: Method,
        uri: Uri,
        version: Version,
        headers: HeaderMap,
        remote_addr: Option<SocketAddr>,
    ) -> Self {
        Self {
            inner: Arc::new(Exchange {
                method,
                uri,
                version,
                headers,
                remote_addr,
                response_headers: Mutex::new(HeaderMap::new()),
            }),
        }
    }

    /// Snapshot a request without touching its body. The client address
    /// comes from axum's `ConnectInfo` extension when the server was started
    /// with it.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let remote_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0);

        Self::new(
            request.method().clone(),
            request.uri().clone(),
            request.version(),
            request.headers().clone(),
            remote_addr,
        )
    }

    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    pub fn uri(&self) -> &Uri {
        &self.inner.uri
    }

    pub fn version(&self) -> Version {
        self.inner.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// First value of `name` if it is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.inner.remote_addr
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }

    /// Add a header to the eventual response.
    pub fn append_response_header(&self, name: HeaderName, value: HeaderValue) {
        let mut headers = self
            .inner
            .response_headers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        headers.append(name, value);
    }

    /// Take the headers handlers added so far.
    pub(crate) fn take_response_headers(&self) -> HeaderMap {
        let mut headers = self
            .inner
            .response_headers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *headers)
    }
}

impl fmt::Debug for HttpContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpContext")
            .field("method", &self.inner.method)
            .field("uri", &self.inner.uri)
            .field("remote_addr", &self.inner.remote_addr)
            .finish_non_exhaustive()
    }
}
