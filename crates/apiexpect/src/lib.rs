//! # apiexpect
//!
//! Fluent assertions for testing HTTP APIs.
//!
//! Build a request, send it, and describe what the response should look
//! like. Every check returns the wrapper it was called on, and navigating
//! into a response (its JSON body, a field, an element) yields a new
//! wrapper that inherits the failure state of its parent. A violated
//! expectation is reported once; the checks that follow it on the same
//! branch are skipped.
//!
//! ## Example
//!
//! ```ignore
//! use apiexpect::Expect;
//! use http::StatusCode;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_user() {
//!     let e = Expect::new("http://localhost:8080");
//!
//!     let mut response = e
//!         .post("/users")
//!         .with_json(&json!({"name": "Alice"}))
//!         .expect()
//!         .await;
//!
//!     response.status(StatusCode::CREATED);
//!     response
//!         .json()
//!         .object()
//!         .contains_key("id")
//!         .value_equal("name", "Alice");
//! }
//! ```
//!
//! ## In-memory testing
//!
//! [`Binder`] calls a handler directly, so no port has to be bound:
//!
//! ```ignore
//! use apiexpect::{Binder, Config, Expect, RecordingReporter};
//!
//! let reporter = Arc::new(RecordingReporter::new());
//! let e = Expect::with_config(Config::new(reporter.clone()).with_client(Binder::echo()));
//! ```

#![doc(html_root_url = "https://docs.rs/apiexpect/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod expect;
mod request;
mod response;
mod settings;

pub use client::{Binder, BinderHandler, Client, HttpClient};
pub use error::{ClientError, ExpectError};
pub use expect::{Config, Expect};
pub use request::Request;
pub use response::{Response, StatusRange};
pub use settings::Settings;

pub use apiexpect_core::{
    canon, canonicalize, Array, Boolean, CanonError, Chain, Null, Number, Object, PanicReporter,
    RecordingReporter, Reporter, Str, Value,
};
pub use apiexpect_telemetry::{init_logging, init_test_logging, LogConfig, TelemetryError};
