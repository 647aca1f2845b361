//! Assertions over JSON arrays.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as Json;

use crate::canon::{canon_all, canon_array, dump, normalize, same_elements};
use crate::chain::Chain;
use crate::number::Number;
use crate::reporter::Reporter;
use crate::value::Value;

/// Inspects an ordered JSON array.
///
/// Methods taking several expected elements accept any iterator of
/// serializable items. Mixed element types can be passed as
/// `serde_json::Value`s:
///
/// ```
/// use std::sync::Arc;
/// use apiexpect_core::{Array, PanicReporter};
/// use serde_json::json;
///
/// let mut array = Array::new(Arc::new(PanicReporter), vec![json!("a"), json!(1)]);
/// array.elements([json!("a"), json!(1)]);
/// array.contains_only([json!(1), json!("a")]);
/// ```
#[derive(Debug, Clone)]
pub struct Array {
    chain: Chain,
    value: Vec<Json>,
}

impl Array {
    /// Creates a root array reporting failures to `reporter`.
    pub fn new(reporter: Arc<dyn Reporter>, value: Vec<Json>) -> Self {
        Self::with_chain(Chain::new(reporter), value)
    }

    /// Creates an array continuing an existing chain.
    pub fn with_chain(chain: Chain, value: Vec<Json>) -> Self {
        Self {
            chain,
            value: value.into_iter().map(normalize).collect(),
        }
    }

    /// Returns the underlying elements in canonical form.
    #[must_use]
    pub fn raw(&self) -> &[Json] {
        &self.value
    }

    /// Returns the chain of this array.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Returns true if a check on this array (or an ancestor) has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.chain.failed()
    }

    /// Returns the number of elements as a [`Number`].
    #[allow(clippy::cast_precision_loss)]
    pub fn length(&self) -> Number {
        Number::with_chain(self.chain.clone(), self.value.len() as f64)
    }

    /// Returns the element at `index`.
    ///
    /// Fails if the index is out of range.
    pub fn element(&mut self, index: usize) -> Value {
        if self.chain.failed() {
            return Value::with_chain(self.chain.clone(), Json::Null);
        }
        match self.value.get(index) {
            Some(item) => Value::with_chain(self.chain.clone(), item.clone()),
            None => {
                self.chain.fail(format_args!(
                    "array index out of bounds:\n  index {index}\n\n  bounds [0; {})",
                    self.value.len()
                ));
                Value::with_chain(self.chain.clone(), Json::Null)
            }
        }
    }

    /// Returns the first element. Fails if the array is empty.
    pub fn first(&mut self) -> Value {
        if self.chain.failed() {
            return Value::with_chain(self.chain.clone(), Json::Null);
        }
        if self.value.is_empty() {
            self.chain
                .fail(format_args!("expected non-empty array, but got empty array"));
            return Value::with_chain(self.chain.clone(), Json::Null);
        }
        self.element(0)
    }

    /// Returns the last element. Fails if the array is empty.
    pub fn last(&mut self) -> Value {
        if self.chain.failed() {
            return Value::with_chain(self.chain.clone(), Json::Null);
        }
        match self.value.len().checked_sub(1) {
            Some(index) => self.element(index),
            None => {
                self.chain
                    .fail(format_args!("expected non-empty array, but got empty array"));
                Value::with_chain(self.chain.clone(), Json::Null)
            }
        }
    }

    /// Succeeds if the array has no elements.
    pub fn empty(&mut self) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if !self.value.is_empty() {
            self.chain.fail(format_args!(
                "expected empty array, but got:\n{}",
                dump(&Json::Array(self.value.clone()))
            ));
        }
        self
    }

    /// Succeeds if the array has at least one element.
    pub fn not_empty(&mut self) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if self.value.is_empty() {
            self.chain
                .fail(format_args!("expected non-empty array, but got empty array"));
        }
        self
    }

    /// Succeeds if the array is canonically equal to `value`.
    pub fn equal<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_array(&mut self.chain, value) else {
            return self;
        };
        if self.value != expected {
            self.chain.fail(format_args!(
                "expected array equal to:\n{}\n\nbut got:\n{}",
                dump(&Json::Array(expected)),
                dump(&Json::Array(self.value.clone()))
            ));
        }
        self
    }

    /// Succeeds if the array is not canonically equal to `value`.
    pub fn not_equal<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_array(&mut self.chain, value) else {
            return self;
        };
        if self.value == expected {
            self.chain.fail(format_args!(
                "expected array not equal to:\n{}",
                dump(&Json::Array(expected))
            ));
        }
        self
    }

    /// Succeeds if the array consists of exactly `values`, in this order.
    pub fn elements<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_all(&mut self.chain, values) else {
            return self;
        };
        if expected.len() != self.value.len() {
            self.chain.fail(format_args!(
                "expected array of length {}, but got length {}:\n{}",
                expected.len(),
                self.value.len(),
                dump(&Json::Array(self.value.clone()))
            ));
            return self;
        }
        let mismatch = self
            .value
            .iter()
            .zip(&expected)
            .position(|(actual, wanted)| actual != wanted);
        if let Some(index) = mismatch {
            self.chain.fail(format_args!(
                "expected array element {index} equal to:\n{}\n\nbut got:\n{}",
                dump(&expected[index]),
                dump(&self.value[index])
            ));
        }
        self
    }

    /// Succeeds if every one of `values` is present in the array.
    pub fn contains<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_all(&mut self.chain, values) else {
            return self;
        };
        if let Some(missing) = expected.iter().find(|item| !self.value.contains(item)) {
            self.chain.fail(format_args!(
                "expected array containing element:\n{}\n\nbut got:\n{}",
                dump(missing),
                dump(&Json::Array(self.value.clone()))
            ));
        }
        self
    }

    /// Succeeds if none of `values` is present in the array.
    pub fn not_contains<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_all(&mut self.chain, values) else {
            return self;
        };
        if let Some(present) = expected.iter().find(|item| self.value.contains(item)) {
            self.chain.fail(format_args!(
                "expected array not containing element:\n{}\n\nbut got:\n{}",
                dump(present),
                dump(&Json::Array(self.value.clone()))
            ));
        }
        self
    }

    /// Succeeds if the array holds exactly `values` in any order.
    ///
    /// Multiplicity matters: `[1, 2, 2]` does not match `[1, 2]`. Key
    /// arrays produced by [`Object::keys`](crate::Object::keys) are unique,
    /// so for them this is plain set equality.
    pub fn contains_only<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_all(&mut self.chain, values) else {
            return self;
        };
        if !same_elements(&self.value, &expected) {
            self.chain.fail(format_args!(
                "expected array containing only elements:\n{}\n\nbut got:\n{}",
                dump(&Json::Array(expected)),
                dump(&Json::Array(self.value.clone()))
            ));
        }
        self
    }
}
