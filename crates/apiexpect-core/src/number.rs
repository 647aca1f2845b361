//! Assertions over JSON numbers.

use std::sync::Arc;

use serde::Serialize;

use crate::canon::canon_number;
use crate::chain::Chain;
use crate::reporter::Reporter;

/// Inspects a numeric value stored as `f64`.
///
/// Every operand may be any numeric type; it is converted to `f64` before
/// comparing. A non-numeric operand fails the chain and the comparison is
/// skipped.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use apiexpect_core::{Number, PanicReporter};
///
/// let mut number = Number::new(Arc::new(PanicReporter), 123.0);
/// number.equal(123_i32).gt(100_u8).in_range(100, 200.5);
/// ```
#[derive(Debug, Clone)]
pub struct Number {
    chain: Chain,
    value: f64,
}

impl Number {
    /// Creates a root number reporting failures to `reporter`.
    pub fn new(reporter: Arc<dyn Reporter>, value: f64) -> Self {
        Self::with_chain(Chain::new(reporter), value)
    }

    /// Creates a number continuing an existing chain.
    pub fn with_chain(chain: Chain, value: f64) -> Self {
        Self { chain, value }
    }

    /// Returns the underlying number.
    #[must_use]
    pub fn raw(&self) -> f64 {
        self.value
    }

    /// Returns the chain of this number.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Returns true if a check on this number (or an ancestor) has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.chain.failed()
    }

    fn compare<T: Serialize>(&mut self, operand: T, op: &str, ok: fn(f64, f64) -> bool) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(operand) = canon_number(&mut self.chain, &operand) else {
            return self;
        };
        if !ok(self.value, operand) {
            self.chain
                .fail(format_args!("expected number {op} {operand}, but got {}", self.value));
        }
        self
    }

    /// Succeeds if the number equals `value`.
    #[allow(clippy::float_cmp)]
    pub fn equal<T: Serialize>(&mut self, value: T) -> &mut Self {
        self.compare(value, "==", |a, b| a == b)
    }

    /// Succeeds if the number differs from `value`.
    #[allow(clippy::float_cmp)]
    pub fn not_equal<T: Serialize>(&mut self, value: T) -> &mut Self {
        self.compare(value, "!=", |a, b| a != b)
    }

    /// Succeeds if the number is greater than `value`.
    pub fn gt<T: Serialize>(&mut self, value: T) -> &mut Self {
        self.compare(value, ">", |a, b| a > b)
    }

    /// Succeeds if the number is greater than or equal to `value`.
    pub fn ge<T: Serialize>(&mut self, value: T) -> &mut Self {
        self.compare(value, ">=", |a, b| a >= b)
    }

    /// Succeeds if the number is less than `value`.
    pub fn lt<T: Serialize>(&mut self, value: T) -> &mut Self {
        self.compare(value, "<", |a, b| a < b)
    }

    /// Succeeds if the number is less than or equal to `value`.
    pub fn le<T: Serialize>(&mut self, value: T) -> &mut Self {
        self.compare(value, "<=", |a, b| a <= b)
    }

    /// Succeeds if the number lies in `[min; max]`.
    ///
    /// Bounds are not validated: with `min > max` the range is empty and
    /// the check fails.
    pub fn in_range<T: Serialize, U: Serialize>(&mut self, min: T, max: U) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(min) = canon_number(&mut self.chain, &min) else {
            return self;
        };
        let Some(max) = canon_number(&mut self.chain, &max) else {
            return self;
        };
        if !(self.value >= min && self.value <= max) {
            self.chain.fail(format_args!(
                "expected number in range [{min}; {max}], but got {}",
                self.value
            ));
        }
        self
    }

    /// Succeeds if the number is within `delta` of `value`.
    pub fn equal_delta<T: Serialize>(&mut self, value: T, delta: f64) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_number(&mut self.chain, &value) else {
            return self;
        };
        if (self.value - expected).abs() > delta {
            self.chain.fail(format_args!(
                "expected number == {expected} (delta {delta}), but got {}",
                self.value
            ));
        }
        self
    }

    /// Succeeds if the number is farther than `delta` from `value`.
    pub fn not_equal_delta<T: Serialize>(&mut self, value: T, delta: f64) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        let Some(expected) = canon_number(&mut self.chain, &value) else {
            return self;
        };
        if (self.value - expected).abs() <= delta {
            self.chain.fail(format_args!(
                "expected number != {expected} (delta {delta}), but got {}",
                self.value
            ));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::RecordingReporter;

    fn number(reporter: &Arc<RecordingReporter>, value: f64) -> Number {
        Number::new(reporter.clone(), value)
    }

    #[test]
    fn test_equal_across_numeric_types() {
        let reporter = Arc::new(RecordingReporter::new());

        number(&reporter, 123.0)
            .equal(123_i32)
            .equal(123_u64)
            .equal(123.0_f32)
            .not_equal(321_i16);
        assert!(reporter.is_empty(), "{:?}", reporter.failures());

        number(&reporter, 123.0).equal(124);
        assert_eq!(reporter.failures(), vec!["expected number == 124, but got 123"]);
    }

    #[test]
    fn test_ordering() {
        let reporter = Arc::new(RecordingReporter::new());

        number(&reporter, 123.0)
            .gt(122)
            .ge(123)
            .lt(124_i64)
            .le(123.0);
        assert!(reporter.is_empty());

        number(&reporter, 123.0).gt(123);
        number(&reporter, 123.0).ge(124);
        number(&reporter, 123.0).lt(123);
        number(&reporter, 123.0).le(122);
        assert_eq!(reporter.count(), 4);
    }

    #[test]
    fn test_in_range() {
        let reporter = Arc::new(RecordingReporter::new());

        number(&reporter, 10.0).in_range(5, 20);
        number(&reporter, 10.0).in_range(10, 10.0_f32);
        assert!(reporter.is_empty());

        number(&reporter, 10.0).in_range(20, 5);
        number(&reporter, 10.0).in_range(11, 20);
        assert_eq!(reporter.count(), 2);
        assert_eq!(
            reporter.failures()[0],
            "expected number in range [20; 5], but got 10"
        );
    }

    #[test]
    fn test_infinite_operands() {
        let reporter = Arc::new(RecordingReporter::new());

        number(&reporter, 1e300).lt(f64::INFINITY).gt(f64::NEG_INFINITY);
        number(&reporter, f64::INFINITY)
            .equal(f64::INFINITY)
            .ge(f32::INFINITY)
            .not_equal(f64::NEG_INFINITY);
        number(&reporter, 5.0).in_range(f64::NEG_INFINITY, f64::INFINITY);
        assert!(reporter.is_empty(), "{:?}", reporter.failures());

        number(&reporter, f64::INFINITY).lt(f64::INFINITY);
        assert_eq!(
            reporter.failures(),
            vec!["expected number < inf, but got inf"]
        );
    }

    #[test]
    fn test_delta() {
        let reporter = Arc::new(RecordingReporter::new());

        number(&reporter, 1.0)
            .equal_delta(1.05, 0.1)
            .not_equal_delta(2, 0.5);
        assert!(reporter.is_empty());

        number(&reporter, 1.0).equal_delta(2, 0.5);
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn test_non_numeric_operand_fails_chain() {
        let reporter = Arc::new(RecordingReporter::new());
        let mut n = number(&reporter, 1.0);

        n.equal("1").equal(1).in_range("a", "b");
        assert!(n.is_failed());
        assert_eq!(
            reporter.failures(),
            vec!["expected numeric value, but got string"]
        );
    }
}
