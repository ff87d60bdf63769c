//! Production transport implementation using reqwest.

use super::{HttpRequest, HttpResponse, Transport, TransportError};

/// Production transport backed by `reqwest::Client`.
///
/// A thin wrapper that implements the [`Transport`] trait, inheriting
/// reqwest's connection pooling and default timeouts.
///
/// # Example
///
/// ```no_run
/// use marble_client::transport::{HttpRequest, ReqwestTransport, Transport};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = ReqwestTransport::new();
/// let url = Url::parse("https://api.marblecms.com/v1/posts")?;
/// let response = transport.send(HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates a transport from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (timeouts, TLS, proxy).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    async fn perform(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_builder() {
                TransportError::InvalidUrl(e.to_string())
            } else {
                TransportError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(Box::new(e)))?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let Some(token) = req.cancel.clone() else {
            return self.perform(req).await;
        };

        if token.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        tokio::select! {
            () = token.cancelled() => Err(TransportError::Cancelled),
            result = self.perform(req) => result,
        }
    }
}
