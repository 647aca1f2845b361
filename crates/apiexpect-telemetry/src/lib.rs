//! # apiexpect Telemetry
//!
//! Logging for apiexpect. Library code emits `tracing` events; this crate
//! installs a `tracing-subscriber` that prints them.
//!
//! - [`init_test_logging`] - idempotent setup for `#[test]` functions
//! - [`init_logging`] - explicit setup from a [`LogConfig`]

#![doc(html_root_url = "https://docs.rs/apiexpect-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, init_test_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
