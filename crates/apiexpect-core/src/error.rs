//! Canonicalization error types.

use std::fmt::Display;

use thiserror::Error;

/// Result type alias using [`CanonError`].
pub type CanonResult<T> = Result<T, CanonError>;

/// Errors that can occur while converting a value to canonical form.
///
/// Inside an assertion chain these never escape: they are turned into a
/// single chain failure and reported through the chain's reporter.
#[derive(Debug, Error)]
pub enum CanonError {
    /// The value could not be serialized into a JSON tree.
    #[error("value can not be converted to canonical form: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A numeric operand was expected.
    #[error("expected numeric value, but got {kind}")]
    NotANumber {
        /// Kind of the value that was found instead.
        kind: &'static str,
    },

    /// A container of a different kind was expected.
    #[error("expected {expected} value, but got {actual}")]
    UnexpectedKind {
        /// Kind that was required.
        expected: &'static str,
        /// Kind that was found.
        actual: &'static str,
    },
}

impl CanonError {
    /// Create a new unexpected kind error.
    pub fn unexpected_kind(expected: &'static str, actual: &'static str) -> Self {
        Self::UnexpectedKind { expected, actual }
    }
}

impl serde::ser::Error for CanonError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Serialize(<serde_json::Error as serde::ser::Error>::custom(msg))
    }
}
