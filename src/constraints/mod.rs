//! Constraints: predicates over a single value that explain their failures.
//!
//! Every constraint answers two independent questions, [`matches`] and
//! [`does_not_match`], and can write typed records describing a failed
//! answer into an [`Errors`] node. The two predicates are *not* required to
//! be complements: an optional type constraint both matches and does not
//! match `null`, and a contract can fail both on a partially valid object.
//!
//! [`matches`]: Constraint::matches
//! [`does_not_match`]: Constraint::does_not_match

mod anything;
mod delegator;
mod hashes;
mod predicate;
mod presence;
mod signature;
mod tuples;
mod type_constraint;

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::{ErrorRecord, Errors};
use crate::kind::ValueKind;
use crate::registry::TypeRef;
use crate::validation::ValidationResult;

pub use anything::{Anything, Nothing};
pub use delegator::DelegatorConstraint;
pub(crate) use hashes::is_symbol_key;
pub use hashes::{ExpectedKeys, ExtraKeysConstraint, RestKeysConstraint, SymbolKeysConstraint, VariadicValuesConstraint};
pub use predicate::PredicateConstraint;
pub use presence::PresenceConstraint;
pub use signature::{Capability, SignatureConstraint};
pub use tuples::{ExpectedCount, ExtraItemsConstraint, RestItemsConstraint, VariadicItemsConstraint};
pub use type_constraint::TypeConstraint;

/// Error type of a constraint that does not declare its own.
pub const INVALID_TYPE: &str = "stannum.constraints.invalid";

/// Negated error type of a constraint that does not declare its own.
pub const VALID_TYPE: &str = "stannum.constraints.valid";

/// A predicate over a value that reports failures as error records.
///
/// Implementors must provide [`matches`](Constraint::matches); everything
/// else has a default. Override the `update_*` methods to write richer
/// records (with data, or at nested paths) than the bare type.
///
/// # Example
///
/// ```rust
/// use stannum::{Constraint, TypeConstraint, ValueKind};
/// use serde_json::json;
///
/// let constraint = TypeConstraint::new(ValueKind::String);
///
/// assert!(constraint.matches(&json!("hello")));
/// assert!(constraint.validate(&json!(42)).is_failure());
///
/// let errors = constraint.errors_for(&json!(42));
/// assert_eq!(errors.to_vec()[0].error_type, "stannum.constraints.is_not_type");
/// ```
pub trait Constraint: Send + Sync {
    /// Identifier of the error written when `matches` is false.
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(INVALID_TYPE)
    }

    /// Identifier of the error written when `does_not_match` is false.
    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(VALID_TYPE)
    }

    /// Returns true if `actual` satisfies the constraint.
    fn matches(&self, actual: &Value) -> bool;

    /// Returns true if `actual` violates the constraint.
    fn does_not_match(&self, actual: &Value) -> bool {
        !self.matches(actual)
    }

    /// Writes the records explaining why `actual` does not match.
    ///
    /// Only called for values that failed [`matches`](Constraint::matches).
    fn update_errors_for(&self, _actual: &Value, errors: &mut Errors) {
        errors.insert(ErrorRecord::new(self.error_type()));
    }

    /// Writes the records explaining why `actual` matches when it should not.
    ///
    /// Only called for values that failed
    /// [`does_not_match`](Constraint::does_not_match).
    fn update_negated_errors_for(&self, _actual: &Value, errors: &mut Errors) {
        errors.insert(ErrorRecord::new(self.negated_error_type()));
    }

    /// Returns a fresh tree describing why `actual` does not match.
    fn errors_for(&self, actual: &Value) -> Errors {
        let mut errors = Errors::new();
        self.update_errors_for(actual, &mut errors);
        errors
    }

    /// Returns a fresh tree describing why `actual` matches when it should not.
    fn negated_errors_for(&self, actual: &Value) -> Errors {
        let mut errors = Errors::new();
        self.update_negated_errors_for(actual, &mut errors);
        errors
    }

    /// Matches `actual`, collecting errors on failure.
    fn validate(&self, actual: &Value) -> ValidationResult {
        if self.matches(actual) {
            Validation::Success(())
        } else {
            Validation::Failure(self.errors_for(actual))
        }
    }

    /// Negated match: succeeds when `actual` does not match.
    fn validate_negated(&self, actual: &Value) -> ValidationResult {
        if self.does_not_match(actual) {
            Validation::Success(())
        } else {
            Validation::Failure(self.negated_errors_for(actual))
        }
    }
}

impl<C: Constraint + ?Sized> Constraint for Arc<C> {
    fn error_type(&self) -> Cow<'_, str> {
        (**self).error_type()
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        (**self).negated_error_type()
    }

    fn matches(&self, actual: &Value) -> bool {
        (**self).matches(actual)
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        (**self).does_not_match(actual)
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        (**self).update_errors_for(actual, errors)
    }

    fn update_negated_errors_for(&self, actual: &Value, errors: &mut Errors) {
        (**self).update_negated_errors_for(actual, errors)
    }
}

impl<C: Constraint + ?Sized> Constraint for Box<C> {
    fn error_type(&self) -> Cow<'_, str> {
        (**self).error_type()
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        (**self).negated_error_type()
    }

    fn matches(&self, actual: &Value) -> bool {
        (**self).matches(actual)
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        (**self).does_not_match(actual)
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        (**self).update_errors_for(actual, errors)
    }

    fn update_negated_errors_for(&self, actual: &Value, errors: &mut Errors) {
        (**self).update_negated_errors_for(actual, errors)
    }
}

/// Things that can stand where a constraint is expected.
///
/// Any constraint converts to itself; a [`ValueKind`] or [`TypeRef`] becomes
/// a required [`TypeConstraint`].
pub trait IntoConstraint {
    /// Converts into a shared constraint.
    fn into_constraint(self) -> Arc<dyn Constraint>;
}

impl<C: Constraint + 'static> IntoConstraint for C {
    fn into_constraint(self) -> Arc<dyn Constraint> {
        Arc::new(self)
    }
}

impl IntoConstraint for ValueKind {
    fn into_constraint(self) -> Arc<dyn Constraint> {
        Arc::new(TypeConstraint::new(self))
    }
}

impl IntoConstraint for TypeRef {
    fn into_constraint(self) -> Arc<dyn Constraint> {
        Arc::new(TypeConstraint::new(self))
    }
}

/// Implements [`Constraint`] for a wrapper by forwarding to one of its fields.
macro_rules! delegate_constraint {
    ($ty:ty => $field:ident) => {
        impl $crate::constraints::Constraint for $ty {
            fn error_type(&self) -> ::std::borrow::Cow<'_, str> {
                $crate::constraints::Constraint::error_type(&self.$field)
            }

            fn negated_error_type(&self) -> ::std::borrow::Cow<'_, str> {
                $crate::constraints::Constraint::negated_error_type(&self.$field)
            }

            fn matches(&self, actual: &serde_json::Value) -> bool {
                $crate::constraints::Constraint::matches(&self.$field, actual)
            }

            fn does_not_match(&self, actual: &serde_json::Value) -> bool {
                $crate::constraints::Constraint::does_not_match(&self.$field, actual)
            }

            fn update_errors_for(&self, actual: &serde_json::Value, errors: &mut $crate::error::Errors) {
                $crate::constraints::Constraint::update_errors_for(&self.$field, actual, errors)
            }

            fn update_negated_errors_for(
                &self,
                actual: &serde_json::Value,
                errors: &mut $crate::error::Errors,
            ) {
                $crate::constraints::Constraint::update_negated_errors_for(&self.$field, actual, errors)
            }
        }
    };
}

pub(crate) use delegate_constraint;
