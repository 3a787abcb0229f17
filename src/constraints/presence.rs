//! Presence checks.

use std::borrow::Cow;

use serde_json::Value;

use crate::constraints::Constraint;

/// Matches values that are neither `null` nor empty.
///
/// Empty means an empty string, array or object. `false` and `0` are present.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceConstraint;

impl PresenceConstraint {
    pub const TYPE: &'static str = "stannum.constraints.absent";
    pub const NEGATED_TYPE: &'static str = "stannum.constraints.present";

    /// Creates the constraint.
    pub fn new() -> Self {
        Self
    }
}

impl Constraint for PresenceConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::TYPE)
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::NEGATED_TYPE)
    }

    fn matches(&self, actual: &Value) -> bool {
        match actual {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        }
    }
}
