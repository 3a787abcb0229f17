//! Nominal type checks.

use std::borrow::Cow;

use serde_json::Value;

use crate::constraints::Constraint;
use crate::error::{ErrorRecord, Errors};
use crate::registry::TypeRef;

/// Matches values that are instances of an expected type.
///
/// A constraint built with [`optional`](TypeConstraint::optional) also matches
/// `null`. Its negation only looks at the type, so an optional constraint both
/// matches and does not match `null`.
///
/// # Example
///
/// ```rust
/// use stannum::{Constraint, TypeConstraint, ValueKind};
/// use serde_json::json;
///
/// let optional_string = TypeConstraint::new(ValueKind::String).optional();
///
/// assert!(optional_string.matches(&json!("text")));
/// assert!(optional_string.matches(&json!(null)));
/// assert!(optional_string.does_not_match(&json!(null)));
/// ```
#[derive(Debug, Clone)]
pub struct TypeConstraint {
    expected: TypeRef,
    required: bool,
}

impl TypeConstraint {
    pub const TYPE: &'static str = "stannum.constraints.is_not_type";
    pub const NEGATED_TYPE: &'static str = "stannum.constraints.is_type";

    /// Creates a required type constraint.
    pub fn new(expected: impl Into<TypeRef>) -> Self {
        Self {
            expected: expected.into(),
            required: true,
        }
    }

    /// Allows `null` to match.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets whether `null` is rejected.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Returns the expected type.
    pub fn expected(&self) -> &TypeRef {
        &self.expected
    }

    /// Returns true if `null` is rejected.
    pub fn is_required(&self) -> bool {
        self.required
    }

    fn is_instance(&self, actual: &Value) -> bool {
        match self.expected.resolve() {
            Some(descriptor) => descriptor.is_instance(actual),
            None => {
                tracing::warn!(
                    target: "stannum::types",
                    name = %self.expected.name(),
                    "Type is not registered; nothing matches it"
                );
                false
            }
        }
    }

    fn record(&self, error_type: &str) -> ErrorRecord {
        ErrorRecord::new(error_type)
            .with_data("required", self.required)
            .with_data("type", self.expected.name())
    }
}

impl Constraint for TypeConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::TYPE)
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::NEGATED_TYPE)
    }

    fn matches(&self, actual: &Value) -> bool {
        (actual.is_null() && !self.required) || self.is_instance(actual)
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        !self.is_instance(actual)
    }

    fn update_errors_for(&self, _actual: &Value, errors: &mut Errors) {
        errors.insert(self.record(Self::TYPE));
    }

    fn update_negated_errors_for(&self, _actual: &Value, errors: &mut Errors) {
        errors.insert(self.record(Self::NEGATED_TYPE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ValueKind;
    use crate::registry::{TypeDescriptor, TypeRegistry};
    use serde_json::json;

    #[test]
    fn test_required_rejects_null() {
        let constraint = TypeConstraint::new(ValueKind::Integer);
        assert!(constraint.matches(&json!(3)));
        assert!(!constraint.matches(&json!(null)));
        assert!(!constraint.matches(&json!("3")));
    }

    #[test]
    fn test_error_data() {
        let errors = TypeConstraint::new(ValueKind::String).errors_for(&json!(1));
        let flat = errors.to_vec();

        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].error_type, TypeConstraint::TYPE);
        assert_eq!(flat[0].data["type"], json!("String"));
        assert_eq!(flat[0].data["required"], json!(true));
    }

    #[test]
    fn test_negated_errors() {
        let constraint = TypeConstraint::new(ValueKind::String).optional();
        let errors = constraint.negated_errors_for(&json!("s"));
        let flat = errors.to_vec();

        assert_eq!(flat[0].error_type, TypeConstraint::NEGATED_TYPE);
        assert_eq!(flat[0].data["required"], json!(false));
        assert!(constraint.validate_negated(&json!("s")).is_failure());
        assert!(constraint.validate_negated(&json!(1)).is_success());
    }

    #[test]
    fn test_optional_null_matches_both_ways() {
        let constraint = TypeConstraint::new(ValueKind::String).optional();
        assert!(constraint.matches(&json!(null)));
        assert!(constraint.does_not_match(&json!(null)));
    }

    #[test]
    fn test_named_type_in_registry() {
        let registry = TypeRegistry::new();
        let constraint = TypeConstraint::new(TypeRef::named_in("Positive", &registry));

        assert!(!constraint.matches(&json!(5)));

        registry
            .register(TypeDescriptor::new("Positive", |v| v.as_i64().is_some_and(|n| n > 0)))
            .unwrap();

        assert!(constraint.matches(&json!(5)));
        assert!(!constraint.matches(&json!(-5)));
        assert_eq!(constraint.errors_for(&json!(-5)).to_vec()[0].data["type"], json!("Positive"));
    }
}
