use crate::constraints::{delegate_constraint, ExpectedCount, ExtraItemsConstraint, IntoConstraint, SignatureConstraint};
use crate::contract::{Contract, DefinitionOptions};
use crate::error::ContractError;

/// A contract on an array, position by position.
///
/// Non-arrays fail the sanity check. Unless built with
/// [`allowing_extra_items`](TupleContract::allowing_extra_items), items past
/// the highest declared position are reported at their index.
///
/// # Example
///
/// ```rust
/// use stannum::{Constraint, PathKey, TupleContract, ValueKind};
/// use serde_json::json;
///
/// let contract = TupleContract::new();
/// contract
///     .add_index_constraint(0, ValueKind::String)
///     .add_index_constraint(1, ValueKind::Integer);
///
/// assert!(contract.matches(&json!(["a", 1])));
///
/// let flat = contract.errors_for(&json!(["a", 1, true])).to_vec();
/// assert_eq!(flat[0].error_type, "stannum.constraints.tuples.extra_items");
/// assert_eq!(flat[0].path, vec![PathKey::index(2)]);
/// ```
#[derive(Debug, Clone)]
pub struct TupleContract {
    contract: Contract,
}

impl TupleContract {
    /// Creates a tuple contract that rejects extra items.
    pub fn new() -> Self {
        let tuple = Self::allowing_extra_items();
        let weak = tuple.contract.downgrade();
        tuple
            .contract
            .add_constraint(ExtraItemsConstraint::new(ExpectedCount::from_fn(move || {
                weak.upgrade().map_or(0, |contract| contract.expected_count())
            })));
        tuple
    }

    /// Creates a tuple contract that ignores extra items.
    pub fn allowing_extra_items() -> Self {
        let contract = Contract::new();
        contract.add_sanity_constraint(SignatureConstraint::tuple());
        Self { contract }
    }

    /// Adds a constraint on the item at `index`.
    pub fn add_index_constraint(&self, index: usize, constraint: impl IntoConstraint) -> &Self {
        self.contract
            .add_unchecked(constraint, DefinitionOptions::new().index(index));
        self
    }

    /// Includes another contract's definitions, live.
    pub fn include(&self, other: &Contract) -> Result<&Self, ContractError> {
        self.contract.include(other)?;
        Ok(self)
    }

    /// One past the highest declared position.
    pub fn expected_count(&self) -> usize {
        self.contract.expected_count()
    }

    /// Returns the underlying contract.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }
}

impl Default for TupleContract {
    fn default() -> Self {
        Self::new()
    }
}

delegate_constraint!(TupleContract => contract);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{Constraint, SignatureConstraint};
    use crate::kind::ValueKind;
    use crate::path::PathKey;
    use serde_json::json;

    fn three_strings() -> TupleContract {
        let contract = TupleContract::new();
        contract
            .add_index_constraint(0, ValueKind::String)
            .add_index_constraint(1, ValueKind::String)
            .add_index_constraint(2, ValueKind::String);
        contract
    }

    #[test]
    fn test_extra_items_reported_with_value() {
        let contract = three_strings();
        let actual = json!(["Who", "What", "I Don't Know", "Tomorrow", "Today"]);

        let flat = contract.errors_for(&actual).to_vec();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].path, vec![PathKey::index(3)]);
        assert_eq!(flat[0].data["value"], json!("Tomorrow"));
        assert_eq!(flat[1].path, vec![PathKey::index(4)]);
        assert_eq!(flat[1].data["value"], json!("Today"));
    }

    #[test]
    fn test_missing_items_are_null() {
        let flat = three_strings().errors_for(&json!(["Who"])).to_vec();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].path, vec![PathKey::index(1)]);
        assert_eq!(flat[1].path, vec![PathKey::index(2)]);
    }

    #[test]
    fn test_non_array_fails_sanity_only() {
        let flat = three_strings().errors_for(&json!("Who")).to_vec();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].error_type, SignatureConstraint::TYPE);
    }

    #[test]
    fn test_allowing_extra_items() {
        let contract = TupleContract::allowing_extra_items();
        contract.add_index_constraint(0, ValueKind::Integer);

        assert!(contract.matches(&json!([1, "two", 3])));
        assert!(!contract.matches(&json!(["one"])));
    }

    #[test]
    fn test_expected_count_follows_included_contracts() {
        let contract = three_strings();
        let more = TupleContract::allowing_extra_items();
        more.add_index_constraint(3, ValueKind::String);
        contract.include(more.contract()).unwrap();

        assert_eq!(contract.expected_count(), 4);
        assert!(contract.matches(&json!(["a", "b", "c", "d"])));
    }
}
