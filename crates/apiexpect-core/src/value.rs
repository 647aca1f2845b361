//! Untyped entry point for decoded JSON documents.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as Json;

use crate::array::Array;
use crate::boolean::Boolean;
use crate::canon::{canon_value, dump, kind_of, normalize};
use crate::chain::Chain;
use crate::null::Null;
use crate::number::Number;
use crate::object::Object;
use crate::reporter::Reporter;
use crate::string::Str;

/// Inspects a value of any JSON kind.
///
/// Narrowing methods ([`object`](Self::object), [`array`](Self::array),
/// [`string`](Self::string), ...) check the runtime kind and return the
/// matching typed wrapper. On a mismatch the chain fails and the returned
/// wrapper carries a zero payload in the failed state, so further calls on
/// it are silently ignored.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use apiexpect_core::{PanicReporter, Value};
/// use serde_json::json;
///
/// let mut value = Value::new(Arc::new(PanicReporter), json!({"users": ["alice"]}));
/// value.object().value("users").array().element(0).string().equal("alice");
/// ```
#[derive(Debug, Clone)]
pub struct Value {
    chain: Chain,
    value: Json,
}

impl Value {
    /// Creates a root value reporting failures to `reporter`.
    pub fn new(reporter: Arc<dyn Reporter>, value: Json) -> Self {
        Self::with_chain(Chain::new(reporter), value)
    }

    /// Creates a value continuing an existing chain.
    pub fn with_chain(chain: Chain, value: Json) -> Self {
        Self {
            chain,
            value: normalize(value),
        }
    }

    /// Returns the underlying JSON value in canonical form.
    #[must_use]
    pub fn raw(&self) -> &Json {
        &self.value
    }

    /// Returns the chain of this value.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Returns true if a check on this value (or an ancestor) has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.chain.failed()
    }

    fn expect_kind(&mut self, expected: &'static str) -> bool {
        if self.chain.failed() {
            return false;
        }
        let actual = kind_of(&self.value);
        if actual != expected {
            self.chain
                .fail(format_args!("expected {expected} value, but got {actual}"));
            return false;
        }
        true
    }

    /// Narrows to an [`Object`].
    pub fn object(&mut self) -> Object {
        let map = if self.expect_kind("object") {
            self.value.as_object().cloned()
        } else {
            None
        };
        Object::with_chain(self.chain.clone(), map.unwrap_or_default())
    }

    /// Narrows to an [`Array`].
    pub fn array(&mut self) -> Array {
        let items = if self.expect_kind("array") {
            self.value.as_array().cloned()
        } else {
            None
        };
        Array::with_chain(self.chain.clone(), items.unwrap_or_default())
    }

    /// Narrows to a [`Str`].
    pub fn string(&mut self) -> Str {
        let text = if self.expect_kind("string") {
            self.value.as_str().map(str::to_owned)
        } else {
            None
        };
        Str::with_chain(self.chain.clone(), text.unwrap_or_default())
    }

    /// Narrows to a [`Number`].
    pub fn number(&mut self) -> Number {
        let number = if self.expect_kind("number") {
            self.value.as_f64()
        } else {
            None
        };
        Number::with_chain(self.chain.clone(), number.unwrap_or_default())
    }

    /// Narrows to a [`Boolean`].
    pub fn boolean(&mut self) -> Boolean {
        let flag = if self.expect_kind("boolean") {
            self.value.as_bool()
        } else {
            None
        };
        Boolean::with_chain(self.chain.clone(), flag.unwrap_or_default())
    }

    /// Narrows to [`Null`], failing unless the value is `null`.
    pub fn null(&mut self) -> Null {
        self.expect_kind("null");
        Null::with_chain(self.chain.clone())
    }

    /// Succeeds if the value is anything but `null`.
    pub fn not_null(&mut self) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if self.value.is_null() {
            self.chain.fail(format_args!("expected non-null value, but got null"));
        }
        self
    }

    /// Succeeds if the value is canonically equal to `value`.
    pub fn equal<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_value(&mut self.chain, value) else {
            return self;
        };
        if self.value != expected {
            self.chain.fail(format_args!(
                "expected value equal to:\n{}\n\nbut got:\n{}",
                dump(&expected),
                dump(&self.value)
            ));
        }
        self
    }

    /// Succeeds if the value is not canonically equal to `value`.
    pub fn not_equal<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_value(&mut self.chain, value) else {
            return self;
        };
        if self.value == expected {
            self.chain.fail(format_args!(
                "expected value not equal to:\n{}",
                dump(&expected)
            ));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::RecordingReporter;
    use serde_json::json;

    fn value(reporter: &Arc<RecordingReporter>, value: Json) -> Value {
        Value::new(reporter.clone(), value)
    }

    #[test]
    fn test_narrowing_matches_kind() {
        let reporter = Arc::new(RecordingReporter::new());

        value(&reporter, json!({"a": 1})).object().contains_key("a");
        value(&reporter, json!([1, 2])).array().length().equal(2);
        value(&reporter, json!("text")).string().equal("text");
        value(&reporter, json!(12)).number().equal(12);
        value(&reporter, json!(true)).boolean().is_true();
        value(&reporter, Json::Null).null();
        value(&reporter, json!(0)).not_null();

        assert!(reporter.is_empty(), "{:?}", reporter.failures());
    }

    #[test]
    fn test_narrowing_mismatch_fails_once() {
        let reporter = Arc::new(RecordingReporter::new());
        let mut root = value(&reporter, json!("text"));

        let mut number = root.number();
        assert!(root.is_failed());
        assert!(number.is_failed());
        assert_eq!(number.raw(), 0.0);

        number.equal(0).gt(100);
        assert_eq!(reporter.failures(), vec!["expected number value, but got string"]);
    }

    #[test]
    fn test_every_narrowing_reports_kind() {
        let cases = [
            (json!(1), "object"),
            (json!({}), "array"),
            (json!(null), "string"),
            (json!([]), "boolean"),
            (json!(false), "number"),
        ];
        for (raw, expected) in cases {
            let reporter = Arc::new(RecordingReporter::new());
            let mut root = value(&reporter, raw.clone());
            match expected {
                "object" => drop(root.object()),
                "array" => drop(root.array()),
                "string" => drop(root.string()),
                "boolean" => drop(root.boolean()),
                _ => drop(root.number()),
            }
            let message = format!("expected {expected} value, but got {}", kind_of(&raw));
            assert_eq!(reporter.failures(), vec![message]);
        }
    }

    #[test]
    fn test_null_and_not_null() {
        let reporter = Arc::new(RecordingReporter::new());
        let null = value(&reporter, json!(1)).null();
        assert!(null.is_failed());

        value(&reporter, Json::Null).not_null();
        assert_eq!(reporter.count(), 2);
    }

    #[test]
    fn test_equal_canonicalizes() {
        let reporter = Arc::new(RecordingReporter::new());

        value(&reporter, json!({"a": [1, 2.0]}))
            .equal(&json!({"a": [1.0, 2]}))
            .not_equal(&json!({"a": [2, 1]}));
        value(&reporter, json!(123)).equal(&123_i32).equal(&123.0_f64);
        assert!(reporter.is_empty(), "{:?}", reporter.failures());

        value(&reporter, json!(123)).equal(&124);
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn test_failed_value_returns_inert_children() {
        let reporter = Arc::new(RecordingReporter::new());
        let mut root = value(&reporter, json!([1]));
        root.equal(&json!([2]));

        let mut array = root.array();
        assert!(array.is_failed());
        assert!(array.raw().is_empty());
        array.element(5).string().equal("x");

        assert_eq!(reporter.count(), 1);
    }
}
