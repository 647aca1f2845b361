//! The JSON `null` sentinel.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as Json;

use crate::canon::{canon_value, kind_of};
use crate::chain::Chain;
use crate::reporter::Reporter;

static NULL: Json = Json::Null;

/// A value known to be `null`.
///
/// Usually obtained from [`Value::null`](crate::Value::null), which is where
/// the actual check happens.
#[derive(Debug, Clone)]
pub struct Null {
    chain: Chain,
}

impl Null {
    /// Creates a root null reporting failures to `reporter`.
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self::with_chain(Chain::new(reporter))
    }

    /// Creates a null continuing an existing chain.
    pub fn with_chain(chain: Chain) -> Self {
        Self { chain }
    }

    /// Returns the payload, always `null`.
    #[must_use]
    pub fn raw(&self) -> &'static Json {
        &NULL
    }

    /// Returns the chain of this null.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Returns true if a check on this null (or an ancestor) has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.chain.failed()
    }

    /// Succeeds if `value` canonicalizes to `null` (for example `None` or `()`).
    pub fn equal<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(value) = canon_value(&mut self.chain, value) else {
            return self;
        };
        if !value.is_null() {
            self.chain
                .fail(format_args!("expected null, but got {}", kind_of(&value)));
        }
        self
    }
}
