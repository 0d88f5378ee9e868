//! Normalized request
//!
//! The one request shape the engine understands. Transports convert their
//! own request type once, so the engine never inspects where a path came
//! from.

use hyper::header::{HeaderName, HeaderValue, ACCEPT_ENCODING, IF_NONE_MATCH, RANGE};
use hyper::{HeaderMap, Method, Request};

/// Method, raw path and headers of one request
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub method: Method,
    /// Path as received, still percent-encoded; may carry a query string
    pub path: String,
    pub headers: HeaderMap,
}

impl AssetRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Shorthand for a `GET` request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Add a header, ignoring values that are not valid header text
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(v) = HeaderValue::from_str(value) {
            self.headers.insert(name, v);
        }
        self
    }

    /// Normalize any `hyper` request
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            headers: req.headers().clone(),
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn range(&self) -> Option<&str> {
        self.header(&RANGE)
    }

    pub fn accept_encoding(&self) -> Option<&str> {
        self.header(&ACCEPT_ENCODING)
    }

    pub fn if_none_match(&self) -> Option<&str> {
        self.header(&IF_NONE_MATCH)
    }
}
