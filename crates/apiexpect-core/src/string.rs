//! Assertions over JSON strings.

use std::sync::Arc;

use regex::Regex;

use crate::chain::Chain;
use crate::number::Number;
use crate::reporter::Reporter;

/// Inspects a string value.
#[derive(Debug, Clone)]
pub struct Str {
    chain: Chain,
    value: String,
}

impl Str {
    /// Creates a root string reporting failures to `reporter`.
    pub fn new(reporter: Arc<dyn Reporter>, value: impl Into<String>) -> Self {
        Self::with_chain(Chain::new(reporter), value.into())
    }

    /// Creates a string continuing an existing chain.
    pub fn with_chain(chain: Chain, value: String) -> Self {
        Self { chain, value }
    }

    /// Returns the underlying text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.value
    }

    /// Returns the chain of this string.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Returns true if a check on this string (or an ancestor) has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.chain.failed()
    }

    /// Returns the number of characters as a [`Number`].
    #[allow(clippy::cast_precision_loss)]
    pub fn length(&self) -> Number {
        Number::with_chain(self.chain.clone(), self.value.chars().count() as f64)
    }

    fn check(&mut self, ok: impl FnOnce(&str) -> bool, describe: &str) -> &mut Self {
        if self.chain.failed() {
            return self;
        }
        if !ok(&self.value) {
            self.chain
                .fail(format_args!("expected string {describe}, but got \"{}\"", self.value));
        }
        self
    }

    /// Succeeds if the string is empty.
    pub fn empty(&mut self) -> &mut Self {
        self.check(str::is_empty, "to be empty")
    }

    /// Succeeds if the string is not empty.
    pub fn not_empty(&mut self) -> &mut Self {
        self.check(|s| !s.is_empty(), "to be non-empty")
    }

    /// Succeeds if the string equals `value`.
    pub fn equal(&mut self, value: &str) -> &mut Self {
        self.check(|s| s == value, &format!("== \"{value}\""))
    }

    /// Succeeds if the string differs from `value`.
    pub fn not_equal(&mut self, value: &str) -> &mut Self {
        self.check(|s| s != value, &format!("!= \"{value}\""))
    }

    /// Succeeds if the string equals `value`, ignoring case.
    pub fn equal_fold(&mut self, value: &str) -> &mut Self {
        self.check(
            |s| fold_eq(s, value),
            &format!("== \"{value}\" (case-insensitive)"),
        )
    }

    /// Succeeds if the string differs from `value`, ignoring case.
    pub fn not_equal_fold(&mut self, value: &str) -> &mut Self {
        self.check(
            |s| !fold_eq(s, value),
            &format!("!= \"{value}\" (case-insensitive)"),
        )
    }

    /// Succeeds if the string contains `value`.
    pub fn contains(&mut self, value: &str) -> &mut Self {
        self.check(|s| s.contains(value), &format!("containing \"{value}\""))
    }

    /// Succeeds if the string does not contain `value`.
    pub fn not_contains(&mut self, value: &str) -> &mut Self {
        self.check(|s| !s.contains(value), &format!("not containing \"{value}\""))
    }

    /// Succeeds if the string contains `value`, ignoring case.
    pub fn contains_fold(&mut self, value: &str) -> &mut Self {
        self.check(
            |s| s.to_lowercase().contains(&value.to_lowercase()),
            &format!("containing \"{value}\" (case-insensitive)"),
        )
    }

    /// Succeeds if the string matches the regular expression `pattern`.
    ///
    /// An invalid pattern fails the chain.
    pub fn matches(&mut self, pattern: &str) -> &mut Self {
        let Some(regex) = self.compile(pattern) else {
            return self;
        };
        self.check(|s| regex.is_match(s), &format!("matching /{pattern}/"))
    }

    /// Succeeds if the string does not match the regular expression `pattern`.
    pub fn not_matches(&mut self, pattern: &str) -> &mut Self {
        let Some(regex) = self.compile(pattern) else {
            return self;
        };
        self.check(|s| !regex.is_match(s), &format!("not matching /{pattern}/"))
    }

    fn compile(&mut self, pattern: &str) -> Option<Regex> {
        if self.chain.failed() {
            return None;
        }
        match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(err) => {
                self.chain
                    .fail(format_args!("invalid regular expression /{pattern}/: {err}"));
                None
            }
        }
    }
}

fn fold_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
