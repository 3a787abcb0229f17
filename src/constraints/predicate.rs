//! Custom leaf constraints built from closures.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::constraints::{Constraint, VALID_TYPE};
use crate::error::{ErrorRecord, Errors};

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A constraint defined by a closure.
///
/// Both error records carry the configured data.
///
/// # Example
///
/// ```rust
/// use stannum::{Constraint, PredicateConstraint};
/// use serde_json::json;
///
/// let in_range = PredicateConstraint::new("not_in_range", |v| {
///     v.as_f64().is_some_and(|n| (0.0..=10.0).contains(&n))
/// })
/// .with_negated_type("in_range")
/// .with_data("range", json!([0, 10]));
///
/// assert!(in_range.matches(&json!(5)));
/// assert!(!in_range.matches(&json!(11.5)));
/// assert_eq!(in_range.errors_for(&json!(11)).to_vec()[0].data["range"], json!([0, 10]));
/// ```
#[derive(Clone)]
pub struct PredicateConstraint {
    predicate: Predicate,
    error_type: String,
    negated_type: String,
    data: Map<String, Value>,
}

impl PredicateConstraint {
    /// Creates a constraint that reports `error_type` when `predicate` is false.
    pub fn new<F>(error_type: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            error_type: error_type.into(),
            negated_type: VALID_TYPE.to_string(),
            data: Map::new(),
        }
    }

    /// Sets the type reported when the predicate holds but should not.
    pub fn with_negated_type(mut self, negated_type: impl Into<String>) -> Self {
        self.negated_type = negated_type.into();
        self
    }

    /// Adds an entry to the data of both error records.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for PredicateConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateConstraint")
            .field("error_type", &self.error_type)
            .field("negated_type", &self.negated_type)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

impl Constraint for PredicateConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.error_type)
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.negated_type)
    }

    fn matches(&self, actual: &Value) -> bool {
        (self.predicate)(actual)
    }

    fn update_errors_for(&self, _actual: &Value, errors: &mut Errors) {
        errors.insert(ErrorRecord::new(&self.error_type).with_data_map(self.data.clone()));
    }

    fn update_negated_errors_for(&self, _actual: &Value, errors: &mut Errors) {
        errors.insert(ErrorRecord::new(&self.negated_type).with_data_map(self.data.clone()));
    }
}
