//! Constraints over the items past a tuple's declared length.
//!
//! The expected length is read on every call, so a contract can hand these
//! constraints a closure over its own definitions and stay in sync as more
//! index constraints are added.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::constraints::{Constraint, IntoConstraint};
use crate::error::{ErrorRecord, Errors};

/// The declared length of a tuple, fixed or computed on demand.
#[derive(Clone)]
pub struct ExpectedCount(Arc<dyn Fn() -> usize + Send + Sync>);

impl ExpectedCount {
    /// Computes the count by calling `f` each time it is needed.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> usize + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Returns the current count.
    pub fn get(&self) -> usize {
        (self.0)()
    }
}

impl From<usize> for ExpectedCount {
    fn from(count: usize) -> Self {
        Self::from_fn(move || count)
    }
}

impl fmt::Debug for ExpectedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpectedCount").field(&self.get()).finish()
    }
}

fn excess_items<'a>(actual: &'a Value, expected: &ExpectedCount) -> &'a [Value] {
    match actual {
        Value::Array(items) => items.get(expected.get()..).unwrap_or(&[]),
        _ => &[],
    }
}

/// Fails when an array has more items than expected.
///
/// Each excess item gets its own error at its index, with the item as
/// `value` in the data. Non-arrays match.
#[derive(Debug, Clone)]
pub struct ExtraItemsConstraint {
    expected: ExpectedCount,
}

impl ExtraItemsConstraint {
    pub const TYPE: &'static str = "stannum.constraints.tuples.extra_items";
    pub const NEGATED_TYPE: &'static str = "stannum.constraints.tuples.no_extra_items";

    pub fn new(expected: impl Into<ExpectedCount>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Returns the current expected count.
    pub fn expected_count(&self) -> usize {
        self.expected.get()
    }
}

impl Constraint for ExtraItemsConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::TYPE)
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::NEGATED_TYPE)
    }

    fn matches(&self, actual: &Value) -> bool {
        excess_items(actual, &self.expected).is_empty()
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        let start = self.expected.get();
        for (offset, item) in excess_items(actual, &self.expected).iter().enumerate() {
            errors
                .child(start + offset)
                .insert(ErrorRecord::new(Self::TYPE).with_data("value", item.clone()));
        }
    }
}

/// Applies a constraint to the array of excess items as a whole.
///
/// Errors are written at the node of the tuple itself.
#[derive(Clone)]
pub struct RestItemsConstraint {
    constraint: Arc<dyn Constraint>,
    expected: ExpectedCount,
}

impl RestItemsConstraint {
    pub fn new(constraint: impl IntoConstraint, expected: impl Into<ExpectedCount>) -> Self {
        Self {
            constraint: constraint.into_constraint(),
            expected: expected.into(),
        }
    }

    fn rest(&self, actual: &Value) -> Value {
        Value::Array(excess_items(actual, &self.expected).to_vec())
    }
}

impl Constraint for RestItemsConstraint {
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

/// Applies a constraint to every excess item.
///
/// Errors for an item are written at its absolute index. With no excess
/// items both predicates hold.
#[derive(Clone)]
pub struct VariadicItemsConstraint {
    constraint: Arc<dyn Constraint>,
    expected: ExpectedCount,
}

impl VariadicItemsConstraint {
    pub fn new(constraint: impl IntoConstraint, expected: impl Into<ExpectedCount>) -> Self {
        Self {
            constraint: constraint.into_constraint(),
            expected: expected.into(),
        }
    }

    fn indexed<'a>(&self, actual: &'a Value) -> impl Iterator<Item = (usize, &'a Value)> {
        let start = self.expected.get();
        excess_items(actual, &self.expected)
            .iter()
            .enumerate()
            .map(move |(offset, item)| (start + offset, item))
    }
}

impl Constraint for VariadicItemsConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        self.constraint.error_type()
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        self.constraint.negated_error_type()
    }

    fn matches(&self, actual: &Value) -> bool {
        self.indexed(actual)
            .all(|(_, item)| self.constraint.matches(item))
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        self.indexed(actual)
            .all(|(_, item)| self.constraint.does_not_match(item))
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        for (index, item) in self.indexed(actual) {
            if !self.constraint.matches(item) {
                self.constraint.update_errors_for(item, errors.child(index));
            }
        }
    }

    fn update_negated_errors_for(&self, actual: &Value, errors: &mut Errors) {
        for (index, item) in self.indexed(actual) {
            if !self.constraint.does_not_match(item) {
                self.constraint
                    .update_negated_errors_for(item, errors.child(index));
            }
        }
    }
}
