//! A fixed slot that forwards to a replaceable constraint.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::constraints::{Constraint, IntoConstraint};
use crate::error::Errors;

/// Forwards every call to a receiver constraint.
///
/// A contract can hold a delegator in one of its definitions and swap the
/// receiver later; the definition itself (and its position) stays put. The
/// parameter contracts use this for their variadic and block slots.
///
/// # Example
///
/// ```rust
/// use stannum::{Anything, Constraint, DelegatorConstraint, Nothing};
/// use serde_json::json;
///
/// let slot = DelegatorConstraint::new(Anything);
/// assert!(slot.matches(&json!(1)));
///
/// slot.set_receiver(Nothing);
/// assert!(!slot.matches(&json!(1)));
/// ```
pub struct DelegatorConstraint {
    receiver: RwLock<Arc<dyn Constraint>>,
}

impl DelegatorConstraint {
    /// Creates a delegator with an initial receiver.
    pub fn new(receiver: impl IntoConstraint) -> Self {
        Self {
            receiver: RwLock::new(receiver.into_constraint()),
        }
    }

    /// Returns the current receiver.
    pub fn receiver(&self) -> Arc<dyn Constraint> {
        Arc::clone(&self.receiver.read())
    }

    /// Replaces the receiver.
    pub fn set_receiver(&self, receiver: impl IntoConstraint) {
        *self.receiver.write() = receiver.into_constraint();
    }
}

impl fmt::Debug for DelegatorConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatorConstraint")
            .field("receiver", &self.receiver().error_type())
            .finish()
    }
}

impl Constraint for DelegatorConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        // Owned: the receiver can be swapped once the lock is released.
        Cow::Owned(self.receiver().error_type().into_owned())
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Owned(self.receiver().negated_error_type().into_owned())
    }

    fn matches(&self, actual: &Value) -> bool {
        self.receiver().matches(actual)
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        self.receiver().does_not_match(actual)
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        self.receiver().update_errors_for(actual, errors)
    }

    fn update_negated_errors_for(&self, actual: &Value, errors: &mut Errors) {
        self.receiver().update_negated_errors_for(actual, errors)
    }
}
