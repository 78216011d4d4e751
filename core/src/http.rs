//! HTTP request/response values and the transport seam.
//!
//! # Design
//! Requests are described as plain data. `CheckBundleClient` builds them
//! without touching the network; whoever owns the connection executes them,
//! either by implementing [`Transport`] or by driving HTTP directly and
//! handing the body back to the `parse_*` methods.
//!
//! Paths are relative (`/check_bundle/12?search=..`). Base URL resolution,
//! authentication and connection management belong to the transport.

use std::fmt;
use std::sync::Arc;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `path` is relative to the API root and already carries its encoded query
/// string, if any. `body` is set only for POST and PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// A raw status/body pair for hosts that execute HTTP themselves.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Any 2xx status yields the body; everything else becomes
    /// [`TransportError::Status`].
    pub fn into_body(self) -> Result<Vec<u8>, TransportError> {
        if (200..300).contains(&self.status) {
            return Ok(self.body);
        }
        Err(TransportError::Status {
            status: self.status,
            body: String::from_utf8_lossy(&self.body).into_owned(),
        })
    }
}

/// The four HTTP primitives the accessor needs.
///
/// Implementations must be safe to call concurrently if the accessor is
/// shared between threads. Timeouts and cancellation are the
/// implementation's business.
pub trait Transport {
    fn get(&self, path: &str) -> Result<Vec<u8>, TransportError>;

    fn post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError>;

    fn put(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError>;

    fn delete(&self, path: &str) -> Result<Vec<u8>, TransportError>;

    /// Dispatch a built request to the matching primitive.
    fn execute(&self, request: &HttpRequest) -> Result<Vec<u8>, TransportError> {
        let body = request.body.as_deref().unwrap_or_default().as_bytes();
        match request.method {
            HttpMethod::Get => self.get(&request.path),
            HttpMethod::Post => self.post(&request.path, body),
            HttpMethod::Put => self.put(&request.path, body),
            HttpMethod::Delete => self.delete(&request.path),
        }
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get(path)
    }

    fn post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        (**self).post(path, body)
    }

    fn put(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        (**self).put(path, body)
    }

    fn delete(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).delete(path)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get(path)
    }

    fn post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        (**self).post(path, body)
    }

    fn put(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        (**self).put(path, body)
    }

    fn delete(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).delete(path)
    }
}
