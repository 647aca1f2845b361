//! Structured logging for apiexpect.
//!
//! Assertion failures and HTTP exchanges are emitted as `tracing` events.
//! Nothing is printed until a subscriber is installed, either explicitly
//! with [`init_logging`] or, inside tests, with [`init_test_logging`].
//!
//! # Example
//!
//! ```rust,ignore
//! use apiexpect_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! ```

use std::sync::Once;

use serde::Deserialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

static TEST_INIT: Once = Once::new();

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "apiexpect=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration showing every chain failure and exchange.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// Creates a configuration emitting JSON lines, for CI log collection.
    #[must_use]
    pub fn json() -> Self {
        Self {
            json_format: true,
            ..Self::default()
        }
    }
}

/// Initializes the global logging subscriber.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` for a bad `level` directive and
/// `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Initializes logging for tests.
///
/// Output goes through the test writer so it is captured per test. Uses
/// `RUST_LOG` when set, `warn` otherwise. Safe to call from every test:
/// only the first call installs a subscriber, and an already-installed
/// subscriber is left in place.
pub fn init_test_logging() {
    TEST_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .compact(),
            )
            .try_init();
    });
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter(e.to_string()))
}

/// Logs that a request is about to be sent.
#[macro_export]
macro_rules! log_request_sent {
    ($method:expr, $url:expr) => {
        tracing::debug!(
            http.method = %$method,
            http.url = %$url,
            "Request sent"
        );
    };
}

/// Logs a received response.
#[macro_export]
macro_rules! log_response_received {
    ($method:expr, $url:expr, $status:expr, $duration_ms:expr) => {
        tracing::debug!(
            http.method = %$method,
            http.url = %$url,
            http.status_code = $status,
            duration_ms = $duration_ms,
            "Response received"
        );
    };
}

/// Logs a transport error.
#[macro_export]
macro_rules! log_request_error {
    ($method:expr, $url:expr, $error:expr) => {
        tracing::warn!(
            http.method = %$method,
            http.url = %$url,
            error = %$error,
            "Request failed"
        );
    };
}
