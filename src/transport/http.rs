//! HTTP request/response value types and the transport trait.

use serde::de::DeserializeOwned;

use super::TransportError;
use crate::cancel::CancelToken;

/// An HTTP request to be sent.
///
/// A value type that can be handed to any [`Transport`] implementation.
/// It uses standard `http` crate types for method and headers, keeping
/// the request description independent of the HTTP library.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (the client only issues GET, but the boundary does
    /// not assume that).
    pub method: http::Method,
    /// Target URL, query string included.
    pub url: url::Url,
    /// Headers to send.
    pub headers: http::HeaderMap,
    /// Token the transport must observe while the request is in flight.
    pub cancel: Option<CancelToken>,
}

impl HttpRequest {
    /// Creates a new request with the given method and URL.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            cancel: None,
        }
    }

    /// Creates a GET request to the given URL.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// Adds a header, appending if the name is already present.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Attaches a cancellation token observed for the request's lifetime.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// An HTTP response received from the server.
///
/// The body is fully buffered into memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: http::StatusCode,
    /// Response headers.
    pub headers: http::HeaderMap,
    /// Response body (fully buffered).
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Canonical reason phrase for the status code.
    #[must_use]
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Returns the body as a UTF-8 string, if valid.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error when the body is not valid
    /// JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Trait for sending HTTP requests.
///
/// Abstracts the wire so the executor, pagination engine and tests all
/// run against the same interface. Implementations must observe
/// `req.cancel` and fail with [`TransportError::Cancelled`] if it fires
/// while the request is in flight.
pub trait Transport: Send + Sync {
    /// Sends a request and returns the buffered response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no usable response was received:
    /// connection failure, timeout, invalid URL, or cancellation.
    fn send(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, TransportError>> + Send;
}
