//! Nominal kinds of JSON values.

use std::fmt::{self, Display};

use serde_json::Value;

/// The nominal type of a value, as checked by a type constraint.
///
/// `Number` accepts both integers and floats; `Integer` and `Float` are
/// disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [ValueKind; 8] = [
        ValueKind::Null,
        ValueKind::Boolean,
        ValueKind::Integer,
        ValueKind::Float,
        ValueKind::Number,
        ValueKind::String,
        ValueKind::Array,
        ValueKind::Object,
    ];

    /// Returns true if `value` is an instance of this kind.
    pub fn is_instance(&self, value: &Value) -> bool {
        match self {
            ValueKind::Null => value.is_null(),
            ValueKind::Boolean => value.is_boolean(),
            ValueKind::Integer => value.is_i64() || value.is_u64(),
            ValueKind::Float => value.is_f64(),
            ValueKind::Number => value.is_number(),
            ValueKind::String => value.is_string(),
            ValueKind::Array => value.is_array(),
            ValueKind::Object => value.is_object(),
        }
    }

    /// Returns the most specific kind of `value`.
    pub fn of(value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Returns the name used in error data and in the type registry.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "Null",
            ValueKind::Boolean => "Boolean",
            ValueKind::Integer => "Integer",
            ValueKind::Float => "Float",
            ValueKind::Number => "Number",
            ValueKind::String => "String",
            ValueKind::Array => "Array",
            ValueKind::Object => "Object",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_covers_integer_and_float() {
        assert!(ValueKind::Number.is_instance(&json!(1)));
        assert!(ValueKind::Number.is_instance(&json!(1.5)));
        assert!(ValueKind::Integer.is_instance(&json!(-3)));
        assert!(!ValueKind::Integer.is_instance(&json!(1.5)));
        assert!(!ValueKind::Float.is_instance(&json!(2)));
    }

    #[test]
    fn test_of_returns_most_specific_kind() {
        assert_eq!(ValueKind::of(&json!(11.5)), ValueKind::Float);
        assert_eq!(ValueKind::of(&json!(5)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Object);
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
    }

    #[test]
    fn test_every_kind_matches_its_own_of() {
        for value in [json!(null), json!(true), json!(1), json!(1.5), json!("s"), json!([]), json!({})] {
            assert!(ValueKind::of(&value).is_instance(&value));
        }
    }
}
