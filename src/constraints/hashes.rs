//! Constraints over the keys of an object.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::constraints::{Constraint, IntoConstraint};
use crate::error::{ErrorRecord, Errors};

static SYMBOL_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*[?!]?$").expect("symbol key pattern is valid")
});

/// Returns true if `key` is a valid keyword name.
pub(crate) fn is_symbol_key(key: &str) -> bool {
    SYMBOL_KEY.is_match(key)
}

/// The declared keys of a map, fixed or computed on demand.
#[derive(Clone)]
pub struct ExpectedKeys(Arc<dyn Fn() -> Vec<String> + Send + Sync>);

impl ExpectedKeys {
    /// Computes the keys by calling `f` each time they are needed.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Returns the current keys.
    pub fn get(&self) -> Vec<String> {
        (self.0)()
    }
}

impl From<Vec<String>> for ExpectedKeys {
    fn from(keys: Vec<String>) -> Self {
        Self::from_fn(move || keys.clone())
    }
}

impl From<&[&str]> for ExpectedKeys {
    fn from(keys: &[&str]) -> Self {
        keys.iter().map(|k| k.to_string()).collect::<Vec<_>>().into()
    }
}

impl<const N: usize> From<[&str; N]> for ExpectedKeys {
    fn from(keys: [&str; N]) -> Self {
        keys.as_slice().into()
    }
}

impl fmt::Debug for ExpectedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpectedKeys").field(&self.get()).finish()
    }
}

fn extra_entries<'a>(actual: &'a Value, expected: &ExpectedKeys) -> Vec<(&'a String, &'a Value)> {
    let Value::Object(map) = actual else {
        return Vec::new();
    };
    let expected = expected.get();
    map.iter()
        .filter(|(key, _)| !expected.iter().any(|e| e == *key))
        .collect()
}

/// Fails when an object has keys outside the expected set.
///
/// Each extra key gets its own error at that key, with its value as `value`
/// in the data. Non-objects match.
#[derive(Debug, Clone)]
pub struct ExtraKeysConstraint {
    expected: ExpectedKeys,
}

impl ExtraKeysConstraint {
    pub const TYPE: &'static str = "stannum.constraints.hashes.extra_keys";
    pub const NEGATED_TYPE: &'static str = "stannum.constraints.hashes.no_extra_keys";

    pub fn new(expected: impl Into<ExpectedKeys>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Returns the current expected keys.
    pub fn expected_keys(&self) -> Vec<String> {
        self.expected.get()
    }
}

impl Constraint for ExtraKeysConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::TYPE)
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::NEGATED_TYPE)
    }

    fn matches(&self, actual: &Value) -> bool {
        extra_entries(actual, &self.expected).is_empty()
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        for (key, value) in extra_entries(actual, &self.expected) {
            errors
                .child(key)
                .insert(ErrorRecord::new(Self::TYPE).with_data("value", value.clone()));
        }
    }
}

/// Fails when an object has a key that is not a valid keyword name.
///
/// Valid names look like identifiers, optionally ending in `?` or `!`.
/// Non-objects match.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolKeysConstraint;

impl SymbolKeysConstraint {
    pub const TYPE: &'static str = "stannum.constraints.hashes.invalid_keys";
    pub const NEGATED_TYPE: &'static str = "stannum.constraints.hashes.valid_keys";

    fn invalid_keys(actual: &Value) -> Vec<Value> {
        match actual {
            Value::Object(map) => map
                .keys()
                .filter(|key| !is_symbol_key(key))
                .map(|key| Value::from(key.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Constraint for SymbolKeysConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::TYPE)
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::NEGATED_TYPE)
    }

    fn matches(&self, actual: &Value) -> bool {
        Self::invalid_keys(actual).is_empty()
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        errors.insert(
            ErrorRecord::new(Self::TYPE).with_data("keys", Value::Array(Self::invalid_keys(actual))),
        );
    }
}

/// Applies a constraint to the object made of the extra entries.
///
/// Errors are written at the node of the map itself.
#[derive(Clone)]
pub struct RestKeysConstraint {
    constraint: Arc<dyn Constraint>,
    expected: ExpectedKeys,
}

impl RestKeysConstraint {
    pub fn new(constraint: impl IntoConstraint, expected: impl Into<ExpectedKeys>) -> Self {
        Self {
            constraint: constraint.into_constraint(),
            expected: expected.into(),
        }
    }

    fn rest(&self, actual: &Value) -> Value {
        let rest: Map<String, Value> = extra_entries(actual, &self.expected)
            .into_iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Value::Object(rest)
    }
}

impl Constraint for RestKeysConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        self.constraint.error_type()
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        self.constraint.negated_error_type()
    }

    fn matches(&self, actual: &Value) -> bool {
        self.constraint.matches(&self.rest(actual))
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        self.constraint.does_not_match(&self.rest(actual))
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        self.constraint.update_errors_for(&self.rest(actual), errors)
    }

    fn update_negated_errors_for(&self, actual: &Value, errors: &mut Errors) {
        self.constraint
            .update_negated_errors_for(&self.rest(actual), errors)
    }
}

/// Applies a constraint to the value of every extra key.
///
/// Errors for a value are written at its key.
#[derive(Clone)]
pub struct VariadicValuesConstraint {
    constraint: Arc<dyn Constraint>,
    expected: ExpectedKeys,
}

impl VariadicValuesConstraint {
    pub fn new(constraint: impl IntoConstraint, expected: impl Into<ExpectedKeys>) -> Self {
        Self {
            constraint: constraint.into_constraint(),
            expected: expected.into(),
        }
    }
}

impl Constraint for VariadicValuesConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        self.constraint.error_type()
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        self.constraint.negated_error_type()
    }

    fn matches(&self, actual: &Value) -> bool {
        extra_entries(actual, &self.expected)
            .into_iter()
            .all(|(_, value)| self.constraint.matches(value))
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        extra_entries(actual, &self.expected)
            .into_iter()
            .all(|(_, value)| self.constraint.does_not_match(value))
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        for (key, value) in extra_entries(actual, &self.expected) {
            if !self.constraint.matches(value) {
                self.constraint.update_errors_for(value, errors.child(key));
            }
        }
    }

    fn update_negated_errors_for(&self, actual: &Value, errors: &mut Errors) {
        for (key, value) in extra_entries(actual, &self.expected) {
            if !self.constraint.does_not_match(value) {
                self.constraint
                    .update_negated_errors_for(value, errors.child(key));
            }
        }
    }
}
