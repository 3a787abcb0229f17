//! Duck-type checks against a declared capability set.

use std::borrow::Cow;
use std::fmt::{self, Display};

use serde_json::Value;

use crate::constraints::Constraint;
use crate::error::{ErrorRecord, Errors};

/// An operation a value can support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Element access by key or position.
    Index,
    /// Iteration over elements.
    Each,
    /// A length.
    Size,
    /// Enumeration of keys.
    Keys,
    /// Ordering against values of the same kind.
    Compare,
}

impl Capability {
    /// Returns the operation name reported in error data.
    pub fn method_name(&self) -> &'static str {
        match self {
            Capability::Index => "[]",
            Capability::Each => "each",
            Capability::Size => "size",
            Capability::Keys => "keys",
            Capability::Compare => "<=>",
        }
    }

    /// Returns the capabilities a value exposes.
    pub fn of(value: &Value) -> &'static [Capability] {
        use Capability::*;

        match value {
            Value::Array(_) => &[Index, Each, Size],
            Value::Object(_) => &[Index, Each, Size, Keys],
            Value::String(_) => &[Index, Size, Compare],
            Value::Number(_) => &[Compare],
            Value::Null | Value::Bool(_) => &[],
        }
    }

    /// Returns true if `value` exposes this capability.
    pub fn is_supported_by(&self, value: &Value) -> bool {
        Capability::of(value).contains(self)
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Matches values exposing every declared capability.
///
/// The negation holds only when the value exposes none of them.
///
/// # Example
///
/// ```rust
/// use stannum::{Constraint, SignatureConstraint};
/// use serde_json::json;
///
/// let tuple = SignatureConstraint::tuple();
///
/// assert!(tuple.matches(&json!([1, 2])));
/// assert!(!tuple.matches(&json!("ab")));
/// assert!(!tuple.does_not_match(&json!("ab")));
/// assert!(tuple.does_not_match(&json!(true)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureConstraint {
    methods: Vec<Capability>,
}

impl SignatureConstraint {
    pub const TYPE: &'static str = "stannum.constraints.does_not_have_methods";
    pub const NEGATED_TYPE: &'static str = "stannum.constraints.has_methods";

    /// Creates a constraint requiring every capability in `methods`.
    pub fn new(methods: impl IntoIterator<Item = Capability>) -> Self {
        let mut unique = Vec::new();
        for method in methods {
            if !unique.contains(&method) {
                unique.push(method);
            }
        }
        Self { methods: unique }
    }

    /// Indexable, iterable and sized.
    pub fn tuple() -> Self {
        Self::new([Capability::Index, Capability::Each, Capability::Size])
    }

    /// Indexable, iterable, keyed and sized.
    pub fn map() -> Self {
        Self::new([
            Capability::Index,
            Capability::Each,
            Capability::Keys,
            Capability::Size,
        ])
    }

    /// Returns the declared capabilities.
    pub fn methods(&self) -> &[Capability] {
        &self.methods
    }

    fn missing(&self, actual: &Value) -> Vec<Capability> {
        self.methods
            .iter()
            .copied()
            .filter(|method| !method.is_supported_by(actual))
            .collect()
    }

    fn names(methods: &[Capability]) -> Value {
        Value::Array(
            methods
                .iter()
                .map(|m| Value::from(m.method_name()))
                .collect(),
        )
    }
}

impl Constraint for SignatureConstraint {
    fn error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::TYPE)
    }

    fn negated_error_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::NEGATED_TYPE)
    }

    fn matches(&self, actual: &Value) -> bool {
        self.missing(actual).is_empty()
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        self.missing(actual).len() == self.methods.len()
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        errors.insert(
            ErrorRecord::new(Self::TYPE)
                .with_data("methods", Self::names(&self.methods))
                .with_data("missing", Self::names(&self.missing(actual))),
        );
    }

    fn update_negated_errors_for(&self, actual: &Value, errors: &mut Errors) {
        let missing = self.missing(actual);
        let present: Vec<Capability> = self
            .methods
            .iter()
            .copied()
            .filter(|m| !missing.contains(m))
            .collect();

        errors.insert(
            ErrorRecord::new(Self::NEGATED_TYPE)
                .with_data("methods", Self::names(&self.methods))
                .with_data("present", Self::names(&present)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capabilities_per_kind() {
        assert!(Capability::of(&json!(null)).is_empty());
        assert!(Capability::Keys.is_supported_by(&json!({})));
        assert!(!Capability::Keys.is_supported_by(&json!([])));
        assert!(Capability::Compare.is_supported_by(&json!(1.5)));
    }

    #[test]
    fn test_map_signature() {
        let map = SignatureConstraint::map();
        assert!(map.matches(&json!({})));
        assert!(!map.matches(&json!([])));
    }

    #[test]
    fn test_missing_methods_in_data() {
        let errors = SignatureConstraint::map().errors_for(&json!([1]));
        let flat = errors.to_vec();

        assert_eq!(flat[0].error_type, SignatureConstraint::TYPE);
        assert_eq!(flat[0].data["methods"], json!(["[]", "each", "keys", "size"]));
        assert_eq!(flat[0].data["missing"], json!(["keys"]));
    }

    #[test]
    fn test_partial_support_fails_both_ways() {
        let tuple = SignatureConstraint::tuple();
        let text = json!("abc");

        assert!(!tuple.matches(&text));
        assert!(!tuple.does_not_match(&text));

        let errors = tuple.negated_errors_for(&text);
        assert_eq!(errors.to_vec()[0].data["present"], json!(["[]", "size"]));
    }

    #[test]
    fn test_duplicate_capabilities_collapse() {
        let constraint = SignatureConstraint::new([Capability::Size, Capability::Size]);
        assert_eq!(constraint.methods(), &[Capability::Size]);
    }
}
