//! Request building.

use std::sync::Arc;
use std::time::Instant;

use apiexpect_core::Chain;
use apiexpect_telemetry::{log_request_error, log_request_sent, log_response_received};
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value as Json;

use crate::client::Client;
use crate::expect::Config;
use crate::response::Response;

/// A request under construction.
///
/// Builder methods never panic: an invalid header or an unserializable
/// body fails the request's chain, and the [`Response`] returned by
/// [`expect`](Self::expect) is then inert.
///
/// # Example
///
/// ```ignore
/// let response = e
///     .post("/users")
///     .with_bearer_token("token")
///     .with_json(&json!({"name": "Alice"}))
///     .expect()
///     .await;
/// ```
#[must_use]
pub struct Request {
    chain: Chain,
    client: Arc<dyn Client>,
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Creates a request for `path`, relative to the configured base URL.
    pub fn new(config: &Config, method: Method, path: &str) -> Self {
        Self {
            chain: Chain::new(Arc::clone(&config.reporter)),
            client: Arc::clone(&config.client),
            method,
            url: join_url(&config.base_url, path),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the full URL, including the query string.
    #[must_use]
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.url)
    }

    /// Returns the headers set so far.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns true if building the request has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.chain.failed()
    }

    /// Sets a header, replacing any previous value.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if self.chain.failed() {
            return self;
        }
        let name = match HeaderName::try_from(name) {
            Ok(name) => name,
            Err(e) => {
                self.chain
                    .fail(format_args!("invalid header name '{name}': {e}"));
                return self;
            }
        };
        let value = match HeaderValue::try_from(value) {
            Ok(value) => value,
            Err(e) => {
                self.chain
                    .fail(format_args!("invalid value for header '{name}': {e}"));
                return self;
            }
        };
        self.headers.insert(name, value);
        self
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn with_bearer_token(self, token: &str) -> Self {
        self.with_header(header::AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }

    /// Appends a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Sets the raw request body.
    pub fn with_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a `text/plain` body.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_bytes(text.into())
            .with_header(header::CONTENT_TYPE.as_str(), "text/plain; charset=utf-8")
    }

    /// Sets a JSON body and the matching Content-Type.
    pub fn with_json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        if self.chain.failed() {
            return self;
        }
        match serde_json::to_vec(value) {
            Ok(bytes) => self
                .with_bytes(bytes)
                .with_header(header::CONTENT_TYPE.as_str(), "application/json; charset=utf-8"),
            Err(e) => {
                self.chain
                    .fail(format_args!("failed to encode JSON body: {e}"));
                self
            }
        }
    }

    /// Sets a form-urlencoded body from a flat map or struct.
    pub fn with_form<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        if self.chain.failed() {
            return self;
        }
        match encode_form(value) {
            Ok(encoded) => self
                .with_bytes(encoded)
                .with_header(header::CONTENT_TYPE.as_str(), "application/x-www-form-urlencoded"),
            Err(reason) => {
                self.chain
                    .fail(format_args!("failed to encode form body: {reason}"));
                self
            }
        }
    }

    /// Sends the request and returns the response for inspection.
    ///
    /// A transport error fails the chain; the returned response is then
    /// inert.
    pub async fn expect(mut self) -> Response {
        if self.chain.failed() {
            return Response::failed(self.chain);
        }
        let url = self.url();

        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(url.as_str());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers);
        }
        let request = match builder.body(self.body) {
            Ok(request) => request,
            Err(e) => {
                self.chain
                    .fail(format_args!("invalid request {} {url}: {e}", self.method));
                return Response::failed(self.chain);
            }
        };

        log_request_sent!(self.method, url);
        let started = Instant::now();

        match self.client.send(request).await {
            Ok(response) => {
                let elapsed = started.elapsed();
                let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                log_response_received!(self.method, url, response.status().as_u16(), elapsed_ms);
                Response::with_chain(self.chain, response, elapsed)
            }
            Err(e) => {
                log_request_error!(self.method, url, e);
                self.chain
                    .fail(format_args!("failed to send {} {url}: {e}", self.method));
                Response::failed(self.chain)
            }
        }
    }
}

/// Joins a base URL and a path with exactly one slash between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn encode_form<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    let json = serde_json::to_value(value).map_err(|e| e.to_string())?;
    let Json::Object(map) = json else {
        return Err("expected a map or struct".to_string());
    };
    let pairs: Vec<String> = map
        .into_iter()
        .map(|(k, v)| {
            let v_str = match v {
                Json::String(s) => s,
                Json::Null => String::new(),
                other => other.to_string(),
            };
            format!("{}={}", urlencoding::encode(&k), urlencoding::encode(&v_str))
        })
        .collect();
    Ok(pairs.join("&"))
}
