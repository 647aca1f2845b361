//! Error types for transport and configuration.
//!
//! Assertion failures are never returned as errors; they go to the
//! [`Reporter`](apiexpect_core::Reporter). These types cover setup work
//! that happens before any chain exists.

use std::path::PathBuf;

use apiexpect_telemetry::TelemetryError;
use thiserror::Error;

/// Errors produced by a [`Client`](crate::Client).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be converted for the transport.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The exchange failed (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be read.
    #[error("failed to read body: {0}")]
    BodyRead(String),
}

/// Errors that can occur while loading settings or building a config.
#[derive(Debug, Error)]
pub enum ExpectError {
    /// Settings file not found.
    #[error("settings file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read settings file.
    #[error("failed to read settings file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// Environment variable parsing error.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParse {
        /// The environment variable name.
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] ClientError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

impl ExpectError {
    /// Create a new environment variable parsing error.
    pub fn env_parse(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParse {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
