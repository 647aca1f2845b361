//! The entry point: a configured factory for requests and root values.

use std::fmt;
use std::sync::Arc;

use apiexpect_core::canon::{self, canonicalize};
use apiexpect_core::{
    Array, Boolean, CanonResult, Chain, Number, Object, PanicReporter, Reporter, Str, Value,
};
use apiexpect_telemetry::init_test_logging;
use http::Method;
use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::client::{Client, HttpClient};
use crate::error::ExpectError;
use crate::request::Request;
use crate::settings::Settings;

/// Shared configuration for an [`Expect`] instance.
#[derive(Clone)]
pub struct Config {
    /// Prefix joined with every request path. May be empty.
    pub base_url: String,
    /// Transport used to send requests.
    pub client: Arc<dyn Client>,
    /// Receives assertion failures.
    pub reporter: Arc<dyn Reporter>,
}

impl Config {
    /// Creates a config with an empty base URL and a default [`HttpClient`].
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self {
            base_url: String::new(),
            client: Arc::new(HttpClient::new()),
            reporter,
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the transport.
    #[must_use]
    pub fn with_client(mut self, client: impl Client + 'static) -> Self {
        self.client = Arc::new(client);
        self
    }

    /// Builds a config from loaded [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns `ExpectError::Client` if the HTTP client cannot be built.
    pub fn from_settings(
        settings: &Settings,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, ExpectError> {
        let client = match settings.timeout() {
            Some(timeout) => HttpClient::with_timeout(timeout)?,
            None => HttpClient::new(),
        };
        Ok(Self {
            base_url: settings.base_url.clone(),
            client: Arc::new(client),
            reporter,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Creates requests and root values sharing one [`Config`].
///
/// # Example
///
/// ```ignore
/// use apiexpect::Expect;
/// use http::StatusCode;
///
/// #[tokio::test]
/// async fn test_users() {
///     let e = Expect::new("http://localhost:8080");
///
///     e.get("/users/1")
///         .expect()
///         .await
///         .status(StatusCode::OK)
///         .json()
///         .object()
///         .value_equal("name", "Alice");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Expect {
    config: Config,
}

impl Expect {
    /// Creates an instance that talks to `base_url` over HTTP and panics on
    /// the first failed assertion.
    ///
    /// Test logging is initialized on first use.
    pub fn new(base_url: impl Into<String>) -> Self {
        init_test_logging();
        Self::with_config(Config::new(Arc::new(PanicReporter::new())).with_base_url(base_url))
    }

    /// Creates an instance from an explicit config.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Returns the config.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts a request with an arbitrary method.
    pub fn request(&self, method: Method, path: &str) -> Request {
        Request::new(&self.config, method, path)
    }

    /// Starts a GET request.
    pub fn get(&self, path: &str) -> Request {
        self.request(Method::GET, path)
    }

    /// Starts a POST request.
    pub fn post(&self, path: &str) -> Request {
        self.request(Method::POST, path)
    }

    /// Starts a PUT request.
    pub fn put(&self, path: &str) -> Request {
        self.request(Method::PUT, path)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, path: &str) -> Request {
        self.request(Method::PATCH, path)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, path: &str) -> Request {
        self.request(Method::DELETE, path)
    }

    /// Starts an OPTIONS request.
    pub fn options(&self, path: &str) -> Request {
        self.request(Method::OPTIONS, path)
    }

    /// Starts a HEAD request.
    pub fn head(&self, path: &str) -> Request {
        self.request(Method::HEAD, path)
    }

    /// Wraps any serializable value.
    pub fn value<T: Serialize + ?Sized>(&self, value: &T) -> Value {
        let (chain, value) = self.root(canonicalize(value), Json::Null);
        Value::with_chain(chain, value)
    }

    /// Wraps a map or struct.
    pub fn object<T: Serialize + ?Sized>(&self, value: &T) -> Object {
        let (chain, value) = self.root(canon::canonicalize_map(value), Map::new());
        Object::with_chain(chain, value)
    }

    /// Wraps a sequence.
    pub fn array<T: Serialize + ?Sized>(&self, value: &T) -> Array {
        let (chain, value) = self.root(canon::canonicalize_array(value), Vec::new());
        Array::with_chain(chain, value)
    }

    /// Wraps a string.
    pub fn string(&self, value: impl Into<String>) -> Str {
        Str::new(Arc::clone(&self.config.reporter), value)
    }

    /// Wraps a number of any primitive numeric type.
    pub fn number<T: Serialize + ?Sized>(&self, value: &T) -> Number {
        let (chain, value) = self.root(canon::canonicalize_number(value), 0.0);
        Number::with_chain(chain, value)
    }

    /// Wraps a boolean.
    pub fn boolean(&self, value: bool) -> Boolean {
        Boolean::new(Arc::clone(&self.config.reporter), value)
    }

    fn root<R>(&self, result: CanonResult<R>, fallback: R) -> (Chain, R) {
        let mut chain = Chain::new(Arc::clone(&self.config.reporter));
        match result {
            Ok(value) => (chain, value),
            Err(e) => {
                chain.fail(format_args!("{e}"));
                (chain, fallback)
            }
        }
    }
}
