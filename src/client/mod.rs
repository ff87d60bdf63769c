//! The Marble API client and its request executor.
//!
//! [`Client`] holds the per-client configuration fixed at construction:
//! base URL, bearer key, default headers, retry policy, transport and
//! sleeper. [`Client::execute`] runs one logical call as an explicit
//! attempt loop (send, classify, consult the policy, wait cancellably,
//! repeat) with all I/O at the loop boundary and the policy as a pure
//! decision function.

use std::fmt;
use std::sync::Arc;

use crate::cancel::{CancelToken, sleep_cancellable};
use crate::error::{Error, ShapeError};
use crate::retry::{DefaultRetryPolicy, Failure, RetryContext, RetryPolicy};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};


/// What ended one attempt, owned by the executor until the policy has
/// spoken.
enum AttemptFailure {
    Transport(TransportError),
    Response(HttpResponse),
}

/// Client for the Marble content API.
///
/// Configuration is read-only after construction; independent method
/// calls share no mutable state. Resource handles hang off the client:
/// [`posts`](crate::resources::Posts), `tags`, `categories`, `authors`.
///
/// # Type Parameters
///
/// - `T`: transport implementation (defaults to [`ReqwestTransport`])
/// - `S`: sleeper used for retry delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use marble_client::client::Client;
///
/// # async fn example() -> Result<(), marble_client::error::Error> {
/// let client = Client::builder("https://api.marblecms.com/v1")
///     .with_api_key("mk_live_...")
///     .build()?;
///
/// let listing = client.posts().list(&Default::default()).await?;
/// println!("{} posts", listing.items.len());
/// # Ok(())
/// # }
/// ```
pub struct Client<T = ReqwestTransport, S = TokioSleeper> {
    base_url: url::Url,
    headers: http::HeaderMap,
    retry_policy: Arc<dyn RetryPolicy>,
    transport: T,
    sleeper: S,
}

impl Client {
    /// Starts building a client for the given API base URL.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Creates a client with default transport, sleeper and retry
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the base URL does not
    /// parse.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        Self::builder(base_url).build()
    }
}

impl<T, S> Client<T, S> {
    /// Returns the configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &url::Url {
        &self.base_url
    }

}

impl<T: Transport, S: Sleeper> Client<T, S> {
    /// Executes one logical GET against the API, retrying per the
    /// configured policy, and returns the parsed JSON body.
    ///
    /// `extra_headers` take precedence over the client's own headers,
    /// which in turn take precedence over the built-in defaults. The
    /// token is checked before every attempt and every inter-retry
    /// delay; the transport additionally observes it mid-flight.
    ///
    /// This is the raw escape hatch under the typed resource methods.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] for a terminal non-2xx response
    /// - [`Error::Transport`] when retries exhaust on transport failures
    /// - [`Error::InvalidShape`] when a 2xx body is not valid JSON
    /// - [`Error::Cancelled`] when the token fires
    pub async fn execute(
        &self,
        path: &str,
        query: &[(String, String)],
        extra_headers: &http::HeaderMap,
        cancel: &CancelToken,
    ) -> Result<serde_json::Value, Error> {
        let url = self.endpoint(path, query)?;
        let request = self.build_request(url, extra_headers, cancel);

        let mut attempt: u32 = 1;
        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let failure = match self.transport.send(request.clone()).await {
                Ok(response) if response.is_success() => {
                    return response.json::<serde_json::Value>().map_err(|e| {
                        Error::InvalidShape(ShapeError::new(
                            "$",
                            format!("response body is not valid JSON: {e}"),
                        ))
                    });
                }
                Ok(response) => AttemptFailure::Response(response),
                Err(TransportError::Cancelled) => return Err(Error::Cancelled),
                Err(err) => AttemptFailure::Transport(err),
            };

            let decision = self.retry_policy.decide(&RetryContext {
                attempt,
                failure: match &failure {
                    AttemptFailure::Transport(err) => Failure::Transport(err),
                    AttemptFailure::Response(response) => Failure::Response(response),
                },
            });

            match decision {
                Some(decision) => {
                    tracing::debug!(path, attempt, delay = ?decision.delay, "retrying request");
                    sleep_cancellable(&self.sleeper, decision.delay, cancel).await?;
                    attempt += 1;
                }
                None => {
                    tracing::debug!(path, attempt, "request failed terminally");
                    return Err(match failure {
                        AttemptFailure::Transport(err) => Error::Transport(err),
                        AttemptFailure::Response(response) => http_failure(&response),
                    });
                }
            }
        }
    }

    fn endpoint(&self, path: &str, query: &[(String, String)]) -> Result<url::Url, Error> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| Error::Configuration(format!("invalid request path `{path}`: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    fn build_request(
        &self,
        url: url::Url,
        extra_headers: &http::HeaderMap,
        cancel: &CancelToken,
    ) -> HttpRequest {
        let mut request = HttpRequest::get(url).with_cancel(cancel.clone());
        request.headers = self.headers.clone();
        for (name, value) in extra_headers {
            request.headers.insert(name, value.clone());
        }
        request
    }
}

/// Maps a terminal non-2xx response to [`Error::Http`], parsing the
/// error body as JSON, falling back to raw text, falling back to absent.
fn http_failure(response: &HttpResponse) -> Error {
    let body = if response.body.is_empty() {
        None
    } else {
        serde_json::from_slice::<serde_json::Value>(&response.body)
            .ok()
            .or_else(|| {
                response
                    .body_text()
                    .map(|text| serde_json::Value::String(text.to_string()))
            })
    };

    Error::Http {
        status: response.status,
        status_text: response.status_text().to_string(),
        body,
    }
}

impl<T: fmt::Debug, S: fmt::Debug> fmt::Debug for Client<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("transport", &self.transport)
            .field("sleeper", &self.sleeper)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`].
///
/// # Example
///
/// ```no_run
/// use marble_client::client::Client;
/// use marble_client::retry::NoRetry;
///
/// # fn example() -> Result<(), marble_client::error::Error> {
/// let client = Client::builder("https://api.marblecms.com/v1")
///     .with_api_key("mk_live_...")
///     .with_retry_policy(NoRetry)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder<T = ReqwestTransport, S = TokioSleeper> {
    base_url: String,
    api_key: Option<String>,
    headers: http::HeaderMap,
    retry_policy: Arc<dyn RetryPolicy>,
    transport: T,
    sleeper: S,
}

impl ClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            headers: http::HeaderMap::new(),
            retry_policy: Arc::new(DefaultRetryPolicy::new()),
            transport: ReqwestTransport::new(),
            sleeper: TokioSleeper,
        }
    }
}

impl<T, S> ClientBuilder<T, S> {
    /// Sets the API key, sent as `Authorization: Bearer <key>`.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Adds a default header sent with every request.
    ///
    /// Overrides the built-in defaults for the same name; per-call
    /// headers override these in turn.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.retry_policy = Arc::new(policy);
        self
    }

    /// Replaces the transport implementation.
    #[must_use]
    pub fn with_transport<T2>(self, transport: T2) -> ClientBuilder<T2, S> {
        ClientBuilder {
            base_url: self.base_url,
            api_key: self.api_key,
            headers: self.headers,
            retry_policy: self.retry_policy,
            transport,
            sleeper: self.sleeper,
        }
    }

    /// Replaces the sleeper used for retry delays.
    ///
    /// Primarily useful for tests that run retry loops without real
    /// waits.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> ClientBuilder<T, S2> {
        ClientBuilder {
            base_url: self.base_url,
            api_key: self.api_key,
            headers: self.headers,
            retry_policy: self.retry_policy,
            transport: self.transport,
            sleeper,
        }
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the base URL does not parse
    /// or the API key contains characters invalid in a header value.
    pub fn build(self) -> Result<Client<T, S>, Error> {
        let mut base = self.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = url::Url::parse(&base)
            .map_err(|e| Error::Configuration(format!("invalid base URL `{base}`: {e}")))?;

        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = &self.api_key {
            let value = http::HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
                Error::Configuration("API key contains invalid header characters".to_string())
            })?;
            headers.insert(http::header::AUTHORIZATION, value);
        }
        for (name, value) in &self.headers {
            headers.insert(name, value.clone());
        }

        Ok(Client {
            base_url,
            headers,
            retry_policy: self.retry_policy,
            transport: self.transport,
            sleeper: self.sleeper,
        })
    }
}
