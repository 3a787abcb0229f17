//! Constraints that ignore the value.

use std::borrow::Cow;

use serde_json::Value;

use crate::constraints::Constraint;

/// Matches every value; its negation never holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anything;

impl Anything {
    pub const TYPE: &'static str = "stannum.constraints.nothing";
    pub const NEGATED_TYPE: &'static str = "stannum.constraints.anything";
}

impl Constraint for Anything {
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::TYPE)
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::NEGATED_TYPE)
    }

    fn matches(&self, _actual: &Value) -> bool {
        true
    }

    fn does_not_match(&self, _actual: &Value) -> bool {
        false
    }
}

/// Matches no value; its negation always holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nothing;

impl Nothing {
    pub const TYPE: &'static str = "stannum.constraints.anything";
    pub const NEGATED_TYPE: &'static str = "stannum.constraints.nothing";
}

impl Constraint for Nothing {
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::TYPE)
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::NEGATED_TYPE)
    }

    fn matches(&self, _actual: &Value) -> bool {
        false
    }

    fn does_not_match(&self, _actual: &Value) -> bool {
        true
    }
}
