//! Transports used to exchange requests and responses.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{header, StatusCode};
use http_body_util::{BodyExt, Full};
use serde_json::{json, Map, Value as Json};

use crate::error::ClientError;

/// Sends an HTTP request and returns the complete response.
///
/// [`HttpClient`] talks to a live server; [`Binder`] calls a handler in
/// memory. Implement this trait to plug in any other transport.
pub trait Client: Send + Sync {
    /// Sends the request.
    fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> BoxFuture<'_, Result<http::Response<Bytes>, ClientError>>;
}

/// Handler function type for [`Binder`].
pub type BinderHandler = Arc<
    dyn Fn(http::Request<Bytes>) -> BoxFuture<'static, http::Response<Full<Bytes>>>
        + Send
        + Sync,
>;

/// Invokes a request handler directly, without a network.
///
/// # Example
///
/// ```ignore
/// use apiexpect::Binder;
///
/// let binder = Binder::new(|req| async move {
///     http::Response::builder()
///         .status(200)
///         .body(Full::new(Bytes::from("OK")))
///         .unwrap()
/// });
/// ```
pub struct Binder {
    handler: BinderHandler,
}

impl Binder {
    /// Creates a binder around an async handler.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(http::Request<Bytes>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = http::Response<Full<Bytes>>> + Send + 'static,
    {
        Self {
            handler: Arc::new(
                move |req| -> BoxFuture<'static, http::Response<Full<Bytes>>> {
                    Box::pin(handler(req))
                },
            ),
        }
    }

    /// Creates a binder that always returns the same response.
    pub fn fixed_response(
        status: StatusCode,
        content_type: &'static str,
        body: impl Into<Bytes>,
    ) -> Self {
        let body = body.into();
        Self::new(move |_req| {
            let body = body.clone();
            async move {
                let mut response = http::Response::new(Full::new(body));
                *response.status_mut() = status;
                if !content_type.is_empty() {
                    response.headers_mut().insert(
                        header::CONTENT_TYPE,
                        header::HeaderValue::from_static(content_type),
                    );
                }
                response
            }
        })
    }

    /// Creates a binder that describes each request as a JSON document.
    ///
    /// The document has `method`, `path`, `query`, `headers` and `body`
    /// fields.
    pub fn echo() -> Self {
        Self::new(|req| async move {
            let headers: Map<String, Json> = req
                .headers()
                .iter()
                .map(|(name, value)| {
                    let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                    (name.as_str().to_string(), Json::String(value))
                })
                .collect();
            let document = json!({
                "method": req.method().as_str(),
                "path": req.uri().path(),
                "query": req.uri().query().unwrap_or_default(),
                "headers": headers,
                "body": String::from_utf8_lossy(req.body()),
            });

            let mut response = http::Response::new(Full::new(Bytes::from(document.to_string())));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/json"),
            );
            response
        })
    }
}

impl Client for Binder {
    fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> BoxFuture<'_, Result<http::Response<Bytes>, ClientError>> {
        let handler = Arc::clone(&self.handler);
        Box::pin(async move {
            let response = (handler)(request).await;
            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| ClientError::BodyRead(e.to_string()))?
                .to_bytes();
            Ok(http::Response::from_parts(parts, body))
        })
    }
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder").finish_non_exhaustive()
    }
}

/// Sends requests to a live server with `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Creates a client with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client that aborts requests after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub fn from_reqwest(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

impl Client for HttpClient {
    fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> BoxFuture<'_, Result<http::Response<Bytes>, ClientError>> {
        Box::pin(async move {
            let request = reqwest::Request::try_from(request)
                .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
            let response = self
                .inner
                .execute(request)
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?;

            let status = response.status();
            let version = response.version();
            let headers = response.headers().clone();
            let body = response
                .bytes()
                .await
                .map_err(|e| ClientError::BodyRead(e.to_string()))?;

            let mut out = http::Response::new(body);
            *out.status_mut() = status;
            *out.version_mut() = version;
            *out.headers_mut() = headers;
            Ok(out)
        })
    }
}
