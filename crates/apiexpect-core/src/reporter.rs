//! Failure sinks.
//!
//! A [`Reporter`] receives one message per failed check. Whether the test
//! keeps running afterwards is up to the implementation: [`PanicReporter`]
//! aborts the test, [`RecordingReporter`] stores the message and returns.

use parking_lot::Mutex;

/// Receives assertion failures.
///
/// Implementations may return normally or unwind (for example by
/// panicking). Wrappers never rely on code after a report being executed.
///
/// A reporter can be shared between chains used from several test threads,
/// hence the `Send + Sync` bound.
pub trait Reporter: Send + Sync {
    /// Reports a failure.
    fn report(&self, message: &str);
}

/// Reporter that panics on the first failure.
///
/// This is the usual choice inside `#[test]` functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl PanicReporter {
    /// Creates a new panicking reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for PanicReporter {
    fn report(&self, message: &str) {
        panic!("{message}");
    }
}

/// Reporter that records failures and lets execution continue.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use apiexpect_core::{Number, RecordingReporter};
///
/// let reporter = Arc::new(RecordingReporter::new());
/// Number::new(reporter.clone(), 10.0).gt(20).lt(0);
///
/// // The second check is ignored once the chain has failed.
/// assert_eq!(reporter.count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingReporter {
    failures: Mutex<Vec<String>>,
}

impl RecordingReporter {
    /// Creates an empty recording reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded failure message, oldest first.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }

    /// Returns the number of recorded failures.
    #[must_use]
    pub fn count(&self) -> usize {
        self.failures.lock().len()
    }

    /// Returns true if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }

    /// Forgets all recorded failures.
    pub fn clear(&self) {
        self.failures.lock().clear();
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, message: &str) {
        tracing::warn!(failure = %message, "assertion failed");
        self.failures.lock().push(message.to_string());
    }
}
