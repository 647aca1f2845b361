//! Assertions over JSON objects.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::array::Array;
use crate::canon::{canon_map, canon_value, contains_subset, dump, normalize};
use crate::chain::Chain;
use crate::reporter::Reporter;
use crate::value::Value;

/// Inspects a string-keyed JSON object.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use apiexpect_core::{Object, PanicReporter};
/// use serde_json::json;
///
/// let map = json!({"id": 7, "name": "alice"}).as_object().cloned().unwrap();
/// let mut object = Object::new(Arc::new(PanicReporter), map);
///
/// object.contains_key("id").value_equal("name", "alice");
/// object.keys().contains_only(["id", "name"]);
/// ```
#[derive(Debug, Clone)]
pub struct Object {
    chain: Chain,
    value: Map<String, Json>,
}

impl Object {
    /// Creates a root object reporting failures to `reporter`.
    pub fn new(reporter: Arc<dyn Reporter>, value: Map<String, Json>) -> Self {
        Self::with_chain(Chain::new(reporter), value)
    }

    /// Creates an object continuing an existing chain.
    pub fn with_chain(chain: Chain, value: Map<String, Json>) -> Self {
        let value = value
            .into_iter()
            .map(|(key, item)| (key, normalize(item)))
            .collect();
        Self { chain, value }
    }

    /// Returns the underlying map in canonical form.
    #[must_use]
    pub fn raw(&self) -> &Map<String, Json> {
        &self.value
    }

    /// Returns the chain of this object.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Returns true if a check on this object (or an ancestor) has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.chain.failed()
    }

    /// Returns the keys as an [`Array`] of strings.
    ///
    /// The order is the map's enumeration order and carries no meaning;
    /// use [`Array::contains_only`] to compare.
    pub fn keys(&self) -> Array {
        let keys = self.value.keys().cloned().map(Json::String).collect();
        Array::with_chain(self.chain.clone(), keys)
    }

    /// Returns the values as an [`Array`], in the same order as [`keys`](Self::keys).
    pub fn values(&self) -> Array {
        let values = self.value.values().cloned().collect();
        Array::with_chain(self.chain.clone(), values)
    }

    /// Returns the value stored under `key`.
    ///
    /// Fails if the key is absent.
    pub fn value(&mut self, key: &str) -> Value {
        if self.chain.failed() {
            return Value::with_chain(self.chain.clone(), Json::Null);
        }
        match self.value.get(key) {
            Some(item) => Value::with_chain(self.chain.clone(), item.clone()),
            None => {
                self.chain.fail(format_args!(
                    "expected object containing key '{key}', but got:\n{}",
                    dump(&Json::Object(self.value.clone()))
                ));
                Value::with_chain(self.chain.clone(), Json::Null)
            }
        }
    }

    /// Succeeds if the object has no keys.
    pub fn empty(&mut self) -> &mut Self {
        self.equal(&Map::new())
    }

    /// Succeeds if the object has at least one key.
    pub fn not_empty(&mut self) -> &mut Self {
        self.not_equal(&Map::new())
    }

    /// Succeeds if the object is canonically equal to `value`.
    ///
    /// `value` may be any map or struct that serializes to an object.
    pub fn equal<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_map(&mut self.chain, value) else {
            return self;
        };
        if self.value != expected {
            self.chain.fail(format_args!(
                "expected object equal to:\n{}\n\nbut got:\n{}",
                dump(&Json::Object(expected)),
                dump(&Json::Object(self.value.clone()))
            ));
        }
        self
    }

    /// Succeeds if the object is not canonically equal to `value`.
    pub fn not_equal<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_map(&mut self.chain, value) else {
            return self;
        };
        if self.value == expected {
            self.chain.fail(format_args!(
                "expected object not equal to:\n{}",
                dump(&Json::Object(expected))
            ));
        }
        self
    }

    /// Succeeds if the object contains `key`.
    pub fn contains_key(&mut self, key: &str) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if !self.value.contains_key(key) {
            self.chain.fail(format_args!(
                "expected object containing key '{key}', but got:\n{}",
                dump(&Json::Object(self.value.clone()))
            ));
        }
        self
    }

    /// Succeeds if the object does not contain `key`.
    pub fn not_contains_key(&mut self, key: &str) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if self.value.contains_key(key) {
            self.chain.fail(format_args!(
                "expected object not containing key '{key}', but got:\n{}",
                dump(&Json::Object(self.value.clone()))
            ));
        }
        self
    }

    /// Succeeds if `subset` is a recursive sub-object of this object.
    ///
    /// Nested objects may omit keys; nested arrays must match in length.
    pub fn contains_map<T: Serialize + ?Sized>(&mut self, subset: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(subset) = canon_map(&mut self.chain, subset) else {
            return self;
        };
        let subset = Json::Object(subset);
        let current = Json::Object(self.value.clone());
        if !contains_subset(&current, &subset) {
            self.chain.fail(format_args!(
                "expected object containing sub-object:\n{}\n\nbut got:\n{}",
                dump(&subset),
                dump(&current)
            ));
        }
        self
    }

    /// Succeeds if `subset` is not a recursive sub-object of this object.
    pub fn not_contains_map<T: Serialize + ?Sized>(&mut self, subset: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(subset) = canon_map(&mut self.chain, subset) else {
            return self;
        };
        let subset = Json::Object(subset);
        let current = Json::Object(self.value.clone());
        if contains_subset(&current, &subset) {
            self.chain.fail(format_args!(
                "expected object not containing sub-object:\n{}\n\nbut got:\n{}",
                dump(&subset),
                dump(&current)
            ));
        }
        self
    }

    /// Succeeds if `key` is present and its value equals `value`.
    pub fn value_equal<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        self.contains_key(key);
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_value(&mut self.chain, value) else {
            return self;
        };
        let actual = &self.value[key];
        if *actual != expected {
            let message = format!(
                "expected value for key '{key}' equal to:\n{}\n\nbut got:\n{}",
                dump(&expected),
                dump(actual)
            );
            self.chain.fail(format_args!("{message}"));
        }
        self
    }

    /// Succeeds if `key` is present and its value differs from `value`.
    pub fn value_not_equal<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        self.contains_key(key);
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_value(&mut self.chain, value) else {
            return self;
        };
        if self.value[key] == expected {
            self.chain.fail(format_args!(
                "expected value for key '{key}' not equal to:\n{}",
                dump(&expected)
            ));
        }
        self
    }
}
