//! Assertions over HTTP responses.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use apiexpect_core::{Chain, Number, Object, Reporter, Str, Value};
use bytes::Bytes;
use http::{header, HeaderMap, StatusCode};
use serde_json::{Map, Value as Json};

/// Class of a status code, by its first digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusRange {
    /// 1xx
    Informational,
    /// 2xx
    Success,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
}

impl StatusRange {
    /// Returns true if `status` belongs to this class.
    #[must_use]
    pub fn contains(self, status: StatusCode) -> bool {
        match self {
            Self::Informational => status.is_informational(),
            Self::Success => status.is_success(),
            Self::Redirection => status.is_redirection(),
            Self::ClientError => status.is_client_error(),
            Self::ServerError => status.is_server_error(),
        }
    }
}

impl fmt::Display for StatusRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Informational => "1xx Informational",
            Self::Success => "2xx Success",
            Self::Redirection => "3xx Redirection",
            Self::ClientError => "4xx Client Error",
            Self::ServerError => "5xx Server Error",
        };
        f.write_str(name)
    }
}

/// A received response with fluent assertions.
///
/// Shares the failure state of the request that produced it: if the
/// request could not be built or sent, every check here is skipped.
pub struct Response {
    chain: Chain,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    elapsed: Duration,
}

impl Response {
    /// Creates a root response reporting failures to `reporter`.
    pub fn new(
        reporter: Arc<dyn Reporter>,
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            chain: Chain::new(reporter),
            status,
            headers,
            body,
            elapsed: Duration::ZERO,
        }
    }

    /// Wraps a transport response, continuing the request's chain.
    pub fn with_chain(chain: Chain, response: http::Response<Bytes>, elapsed: Duration) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            chain,
            status: parts.status,
            headers: parts.headers,
            body,
            elapsed,
        }
    }

    /// Creates an inert response for a chain that has already failed.
    pub(crate) fn failed(chain: Chain) -> Self {
        Self {
            chain,
            status: StatusCode::default(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn raw_status(&self) -> StatusCode {
        self.status
    }

    /// Returns the headers.
    #[must_use]
    pub fn raw_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn raw_body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the chain of this response.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Returns true if the request or a check on this response has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.chain.failed()
    }

    /// Returns the round-trip time in milliseconds as a [`Number`].
    pub fn duration(&self) -> Number {
        Number::with_chain(self.chain.clone(), self.elapsed.as_secs_f64() * 1000.0)
    }

    /// Succeeds if the status code equals `expected`.
    pub fn status(&mut self, expected: StatusCode) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if self.status != expected {
            self.chain.fail(format_args!(
                "expected status {expected}, but got {}",
                self.status
            ));
        }
        self
    }

    /// Succeeds if the status code equals the numeric `expected`.
    pub fn status_code(&mut self, expected: u16) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        match StatusCode::from_u16(expected) {
            Ok(expected) => self.status(expected),
            Err(e) => {
                self.chain
                    .fail(format_args!("invalid expected status {expected}: {e}"));
                self
            }
        }
    }

    /// Succeeds if the status code belongs to `range`.
    pub fn status_range(&mut self, range: StatusRange) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if !range.contains(self.status) {
            self.chain.fail(format_args!(
                "expected status in range {range}, but got {}",
                self.status
            ));
        }
        self
    }

    /// Returns the value of header `name` as a [`Str`].
    ///
    /// Fails if the header is missing or not valid UTF-8.
    pub fn header(&mut self, name: &str) -> Str {
        if self.chain.failed() {
            return Str::with_chain(self.chain.clone(), String::new());
        }
        let value = self.headers.get(name).map(|value| value.to_str());
        match value {
            Some(Ok(text)) => {
                let text = text.to_string();
                Str::with_chain(self.chain.clone(), text)
            }
            Some(Err(_)) => {
                self.chain
                    .fail(format_args!("header '{name}' is not valid UTF-8"));
                Str::with_chain(self.chain.clone(), String::new())
            }
            None => {
                self.chain
                    .fail(format_args!("expected header '{name}', but it is missing"));
                Str::with_chain(self.chain.clone(), String::new())
            }
        }
    }

    /// Returns all headers as an [`Object`].
    ///
    /// Names are lowercase. Repeated headers are joined with `", "`.
    pub fn headers(&self) -> Object {
        let mut map = Map::new();
        for name in self.headers.keys() {
            let joined = self
                .headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            map.insert(name.as_str().to_string(), Json::String(joined));
        }
        Object::with_chain(self.chain.clone(), map)
    }

    /// Succeeds if the Content-Type media type is `media` (charset ignored).
    pub fn content_type(&mut self, media: &str) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        self.check_content_type(media, false);
        self
    }

    /// Succeeds if the response has no body and no Content-Type.
    pub fn no_content(&mut self) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if let Some(content_type) = self.headers.get(header::CONTENT_TYPE) {
            let content_type = String::from_utf8_lossy(content_type.as_bytes()).into_owned();
            self.chain.fail(format_args!(
                "expected no Content-Type header, but got \"{content_type}\""
            ));
            return self;
        }
        if !self.body.is_empty() {
            self.chain.fail(format_args!(
                "expected empty body, but got {} bytes",
                self.body.len()
            ));
        }
        self
    }

    /// Returns the body as a [`Str`], decoding invalid UTF-8 lossily.
    pub fn body(&self) -> Str {
        let text = String::from_utf8_lossy(&self.body).into_owned();
        Str::with_chain(self.chain.clone(), text)
    }

    /// Returns the body of a `text/plain` response as a [`Str`].
    pub fn text(&mut self) -> Str {
        if self.chain.failed() || !self.check_content_type("text/plain", true) {
            return Str::with_chain(self.chain.clone(), String::new());
        }
        self.body()
    }

    /// Decodes the body of an `application/json` response into a [`Value`].
    ///
    /// Fails on a wrong Content-Type, a non-UTF-8 charset or a malformed
    /// document.
    pub fn json(&mut self) -> Value {
        if self.chain.failed() || !self.check_content_type("application/json", true) {
            return Value::with_chain(self.chain.clone(), Json::Null);
        }
        match serde_json::from_slice::<Json>(&self.body) {
            Ok(document) => Value::with_chain(self.chain.clone(), document),
            Err(e) => {
                self.chain
                    .fail(format_args!("failed to decode JSON body: {e}"));
                Value::with_chain(self.chain.clone(), Json::Null)
            }
        }
    }

    fn check_content_type(&mut self, expected: &str, check_charset: bool) -> bool {
        let Some(value) = self.headers.get(header::CONTENT_TYPE) else {
            self.chain.fail(format_args!(
                "expected Content-Type \"{expected}\", but header is missing"
            ));
            return false;
        };
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();

        let mut params = value.split(';');
        let media = params.next().unwrap_or_default().trim();
        if !media.eq_ignore_ascii_case(expected) {
            self.chain.fail(format_args!(
                "expected Content-Type \"{expected}\", but got \"{media}\""
            ));
            return false;
        }

        if check_charset {
            let charset = params
                .filter_map(|param| param.split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
                .map(|(_, charset)| charset.trim().trim_matches('"'));
            if let Some(charset) = charset {
                if !charset.eq_ignore_ascii_case("utf-8") {
                    self.chain.fail(format_args!(
                        "expected charset \"utf-8\", but got \"{charset}\""
                    ));
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .field("failed", &self.chain.failed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiexpect_core::RecordingReporter;
    use http::HeaderValue;
    use serde_json::json;

    fn create_response(
        reporter: &Arc<RecordingReporter>,
        status: u16,
        content_type: &'static str,
        body: &str,
    ) -> Response {
        let mut headers = HeaderMap::new();
        if !content_type.is_empty() {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        Response::new(
            reporter.clone(),
            StatusCode::from_u16(status).unwrap(),
            headers,
            Bytes::from(body.to_string()),
        )
    }

    #[test]
    fn test_status() {
        let reporter = Arc::new(RecordingReporter::new());

        create_response(&reporter, 200, "", "")
            .status(StatusCode::OK)
            .status_code(200)
            .status_range(StatusRange::Success);
        assert!(reporter.is_empty());

        create_response(&reporter, 404, "", "").status(StatusCode::OK);
        create_response(&reporter, 404, "", "").status_range(StatusRange::ServerError);
        assert_eq!(
            reporter.failures(),
            vec![
                "expected status 200 OK, but got 404 Not Found",
                "expected status in range 5xx Server Error, but got 404 Not Found",
            ]
        );
    }

    #[test]
    fn test_status_range_contains() {
        assert!(StatusRange::Informational.contains(StatusCode::CONTINUE));
        assert!(StatusRange::Redirection.contains(StatusCode::FOUND));
        assert!(StatusRange::ClientError.contains(StatusCode::NOT_FOUND));
        assert!(!StatusRange::Success.contains(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_header() {
        let reporter = Arc::new(RecordingReporter::new());
        let mut response = create_response(&reporter, 200, "application/json", "{}");

        response.header("Content-Type").equal("application/json");
        response
            .headers()
            .value("content-type")
            .string()
            .equal("application/json");
        assert!(reporter.is_empty());

        response.header("X-Missing").equal("anything");
        assert!(response.is_failed());
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn test_repeated_headers_are_joined() {
        let reporter = Arc::new(RecordingReporter::new());
        let mut headers = HeaderMap::new();
        headers.append("x-tag", HeaderValue::from_static("a"));
        headers.append("x-tag", HeaderValue::from_static("b"));
        let response = Response::new(reporter.clone(), StatusCode::OK, headers, Bytes::new());

        response.headers().value_equal("x-tag", "a, b");
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_content_type() {
        let reporter = Arc::new(RecordingReporter::new());

        create_response(&reporter, 200, "application/json; charset=utf-8", "{}")
            .content_type("application/json");
        assert!(reporter.is_empty());

        create_response(&reporter, 200, "text/html", "").content_type("application/json");
        create_response(&reporter, 200, "", "").content_type("application/json");
        assert_eq!(reporter.count(), 2);
    }

    #[test]
    fn test_json() {
        let reporter = Arc::new(RecordingReporter::new());
        let mut response = create_response(
            &reporter,
            200,
            "application/json; charset=UTF-8",
            r#"{"name":"Alice","age":30}"#,
        );

        let mut object = response.json().object();
        object.value_equal("name", "Alice").value_equal("age", &30);
        object.equal(&json!({"name": "Alice", "age": 30.0}));
        assert!(reporter.is_empty(), "{:?}", reporter.failures());
    }

    #[test]
    fn test_json_failures() {
        let reporter = Arc::new(RecordingReporter::new());

        let value = create_response(&reporter, 200, "text/plain", "{}").json();
        assert!(value.is_failed());

        let value = create_response(&reporter, 200, "application/json; charset=latin1", "{}").json();
        assert!(value.is_failed());

        let mut response = create_response(&reporter, 200, "application/json", "{not json");
        let mut value = response.json();
        value.object().empty();
        assert!(response.is_failed());

        assert_eq!(reporter.count(), 3);
        assert!(reporter.failures()[2].starts_with("failed to decode JSON body"));
    }

    #[test]
    fn test_text_and_body() {
        let reporter = Arc::new(RecordingReporter::new());

        create_response(&reporter, 200, "text/plain; charset=utf-8", "hello")
            .text()
            .equal("hello");
        create_response(&reporter, 200, "application/json", "[]")
            .body()
            .equal("[]");
        assert!(reporter.is_empty());

        create_response(&reporter, 200, "application/json", "[]").text();
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn test_no_content() {
        let reporter = Arc::new(RecordingReporter::new());

        create_response(&reporter, 204, "", "").no_content();
        assert!(reporter.is_empty());

        create_response(&reporter, 200, "", "body").no_content();
        create_response(&reporter, 200, "text/plain", "").no_content();
        assert_eq!(reporter.count(), 2);
    }

    #[test]
    fn test_failed_response_is_inert() {
        let reporter = Arc::new(RecordingReporter::new());
        let mut chain = Chain::new(reporter.clone());
        chain.fail(format_args!("request failed"));

        let mut response = Response::failed(chain);
        response.status(StatusCode::IM_A_TEAPOT).no_content();
        response.json().object().value("x").number().equal(1);
        response.header("x").equal("y");
        response.duration().gt(1_000_000);

        assert_eq!(reporter.count(), 1);
    }
}
