//! Values as seen by a contract while it walks its definitions.
//!
//! Plain contracts resolve a missing property to `null`. Parameter contracts
//! need to tell "no argument was passed" apart from "`null` was passed", so
//! property resolution yields a [`Resolved`] value whose
//! [`Undefined`](Resolved::Undefined) variant is the UNDEFINED sentinel.

use serde_json::Value;
use stillwater::Validation;

use crate::error::Errors;

/// Result of matching a value: success, or the tree of errors explaining why not.
pub type ValidationResult = Validation<(), Errors>;

/// The shared `null` used when a missing value is treated as nil.
pub(crate) static NULL: Value = Value::Null;

/// The outcome of resolving a definition's property against a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// Nothing was supplied at this position or name.
    Undefined,
    /// A value was found (possibly an explicit `null`).
    Value(&'a Value),
}

/// The UNDEFINED sentinel, distinct from any JSON value including `null`.
pub const UNDEFINED: Resolved<'static> = Resolved::Undefined;

impl<'a> Resolved<'a> {
    /// Returns true for the UNDEFINED sentinel.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Resolved::Undefined)
    }

    /// Returns the value, substituting `null` for UNDEFINED.
    pub fn value_or_null(&self) -> &'a Value {
        match self {
            Resolved::Undefined => &NULL,
            Resolved::Value(value) => value,
        }
    }

    /// Returns the value, or None for UNDEFINED.
    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Resolved::Undefined => None,
            Resolved::Value(value) => Some(value),
        }
    }
}

impl<'a> From<&'a Value> for Resolved<'a> {
    fn from(value: &'a Value) -> Self {
        Resolved::Value(value)
    }
}
