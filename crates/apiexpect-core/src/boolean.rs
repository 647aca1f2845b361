//! Assertions over JSON booleans.

use std::sync::Arc;

use crate::chain::Chain;
use crate::reporter::Reporter;

/// Inspects a boolean value.
#[derive(Debug, Clone)]
pub struct Boolean {
    chain: Chain,
    value: bool,
}

impl Boolean {
    /// Creates a root boolean reporting failures to `reporter`.
    pub fn new(reporter: Arc<dyn Reporter>, value: bool) -> Self {
        Self::with_chain(Chain::new(reporter), value)
    }

    /// Creates a boolean continuing an existing chain.
    pub fn with_chain(chain: Chain, value: bool) -> Self {
        Self { chain, value }
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn raw(&self) -> bool {
        self.value
    }

    /// Returns the chain of this boolean.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Returns true if a check on this boolean (or an ancestor) has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.chain.failed()
    }

    /// Succeeds if the boolean equals `value`.
    pub fn equal(&mut self, value: bool) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if self.value != value {
            self.chain
                .fail(format_args!("expected boolean == {value}, but got {}", self.value));
        }
        self
    }

    /// Succeeds if the boolean differs from `value`.
    pub fn not_equal(&mut self, value: bool) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if self.value == value {
            self.chain
                .fail(format_args!("expected boolean != {value}, but got {}", self.value));
        }
        self
    }

    /// Succeeds if the boolean is `true`.
    pub fn is_true(&mut self) -> &mut Self {
        self.equal(true)
    }

    /// Succeeds if the boolean is `false`.
    pub fn is_false(&mut self) -> &mut Self {
        self.equal(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::RecordingReporter;

    #[test]
    fn test_true_and_false() {
        let reporter = Arc::new(RecordingReporter::new());

        Boolean::new(reporter.clone(), true)
            .is_true()
            .equal(true)
            .not_equal(false);
        Boolean::new(reporter.clone(), false).is_false();
        assert!(reporter.is_empty());

        Boolean::new(reporter.clone(), true).is_false();
        Boolean::new(reporter.clone(), false).not_equal(false);
        assert_eq!(
            reporter.failures(),
            vec![
                "expected boolean == false, but got true",
                "expected boolean != false, but got false",
            ]
        );
    }

    #[test]
    fn test_failed_boolean_ignores_checks() {
        let reporter = Arc::new(RecordingReporter::new());
        let mut flag = Boolean::new(reporter.clone(), true);

        flag.is_false().is_false().not_equal(true);
        assert!(flag.is_failed());
        assert_eq!(reporter.count(), 1);
    }
}
