//! Per-lineage failure state.

use std::fmt;
use std::sync::Arc;

use crate::reporter::Reporter;

/// Failure state of one assertion lineage plus its reporter handle.
///
/// A chain starts in the ok state and moves to failed on the first
/// violated check. Failed is terminal. Wrappers derive a child chain by
/// cloning: the child starts with the parent's current state and evolves
/// independently afterwards, while the reporter is shared.
#[derive(Clone)]
pub struct Chain {
    reporter: Arc<dyn Reporter>,
    failed: bool,
}

impl Chain {
    /// Creates a new chain in the ok state.
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self {
            reporter,
            failed: false,
        }
    }

    /// Returns true once any check on this chain has failed.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Returns the shared reporter.
    #[must_use]
    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    /// Marks the chain failed and reports the message.
    ///
    /// A chain that has already failed swallows the message, so a single
    /// root cause is reported once per lineage. The state flips before the
    /// reporter runs because the reporter may unwind.
    pub fn fail(&mut self, message: fmt::Arguments<'_>) {
        if self.failed {
            return;
        }
        self.failed = true;

        let message = message.to_string();
        tracing::debug!(failure = %message, "chain failed");
        self.reporter.report(&message);
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}
