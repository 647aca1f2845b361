//! Layered settings for test suites.
//!
//! Values are applied in layers, later layers overriding earlier ones:
//! 1. Defaults
//! 2. A TOML document or file
//! 3. Environment variables (`{PREFIX}_BASE_URL`, `{PREFIX}_TIMEOUT_MS`,
//!    `{PREFIX}_LOG_LEVEL`)
//!
//! ```toml
//! base_url = "http://localhost:8080"
//! timeout_ms = 5000
//!
//! [logging]
//! level = "apiexpect=debug"
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use apiexpect_telemetry::LogConfig;
use serde::Deserialize;

use crate::error::ExpectError;

/// Settings for an [`Expect`](crate::Expect) instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Prefix joined with every request path.
    pub base_url: String,

    /// Request timeout in milliseconds. No timeout when unset.
    pub timeout_ms: Option<u64>,

    /// Logging configuration.
    pub logging: LogConfig,
}

impl Settings {
    /// Parses settings from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ExpectError::Toml` for malformed TOML or unknown fields.
    pub fn from_toml_str(content: &str) -> Result<Self, ExpectError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ExpectError` if the file is missing, unreadable or invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExpectError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExpectError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ExpectError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ExpectError::EnvParse` if a variable has an invalid value.
    pub fn with_env_prefix(self, prefix: &str) -> Result<Self, ExpectError> {
        self.apply_env(prefix, |key| env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ExpectError::EnvParse` if a variable has an invalid value.
    pub fn apply_env<F>(mut self, prefix: &str, lookup: F) -> Result<Self, ExpectError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = prefix.to_uppercase();

        if let Some(base_url) = lookup(&format!("{prefix}_BASE_URL")) {
            self.base_url = base_url;
        }

        let key = format!("{prefix}_TIMEOUT_MS");
        if let Some(value) = lookup(&key) {
            self.timeout_ms = if value.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ExpectError::env_parse(&key, "expected integer or 'none'"))?,
                )
            };
        }

        if let Some(level) = lookup(&format!("{prefix}_LOG_LEVEL")) {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Returns the request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
