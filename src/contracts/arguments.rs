use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::constraints::{
    delegate_constraint, DelegatorConstraint, ExpectedCount, ExtraItemsConstraint, IntoConstraint,
    RestItemsConstraint, SignatureConstraint, VariadicItemsConstraint,
};
use crate::contract::{Contract, DefinitionOptions, Missing};
use crate::contracts::ParameterOptions;
use crate::error::ContractError;

/// A contract on the positional arguments of a call.
///
/// An argument that was not passed resolves to UNDEFINED: a constraint
/// added with a default skips it, any other constraint sees `null`. An
/// explicit `null` argument is always checked.
///
/// Arguments past the declared positions are rejected one by one, unless a
/// variadic constraint is set.
///
/// # Example
///
/// ```rust
/// use stannum::{ArgumentsContract, Constraint, ParameterOptions, ValueKind};
/// use serde_json::json;
///
/// let contract = ArgumentsContract::new();
/// contract.add_argument_constraint(None, ValueKind::String, ParameterOptions::new());
/// contract.set_variadic_item_constraint(ValueKind::Integer).unwrap();
///
/// assert!(contract.matches(&json!(["sum", 1, 2, 3])));
/// assert!(!contract.matches(&json!(["sum", 1, "2"])));
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentsContract {
    contract: Contract,
    variadic: Arc<DelegatorConstraint>,
    variadic_set: Arc<AtomicBool>,
}

impl ArgumentsContract {
    /// Creates a contract accepting no arguments.
    pub fn new() -> Self {
        let contract = Contract::with_missing(Missing::Undefined);
        contract.add_sanity_constraint(SignatureConstraint::tuple());

        let variadic = Arc::new(DelegatorConstraint::new(ExtraItemsConstraint::new(
            expected_count(&contract),
        )));
        contract.add_constraint(Arc::clone(&variadic));

        Self {
            contract,
            variadic,
            variadic_set: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Adds a constraint on the argument at `index`.
    ///
    /// With no index the constraint goes after the last declared position.
    pub fn add_argument_constraint(
        &self,
        index: impl Into<Option<usize>>,
        constraint: impl IntoConstraint,
        options: ParameterOptions,
    ) -> &Self {
        let index = index.into().unwrap_or_else(|| self.expected_count());
        tracing::debug!(target: "stannum::parameters", index, "Adding argument constraint");

        self.contract
            .add_unchecked(constraint, options.apply(DefinitionOptions::new().index(index)));
        self
    }

    /// Applies `constraint` to the array of arguments past the declared ones.
    ///
    /// Fails with [`ContractError::VariadicArgumentsAlreadySet`] if a variadic
    /// constraint is already set.
    pub fn set_variadic_constraint(
        &self,
        constraint: impl IntoConstraint,
    ) -> Result<&Self, ContractError> {
        self.claim_variadic()?;
        self.variadic
            .set_receiver(RestItemsConstraint::new(constraint, expected_count(&self.contract)));
        Ok(self)
    }

    /// Applies `constraint` to each argument past the declared ones.
    ///
    /// Errors are reported at each argument's own index. Fails with
    /// [`ContractError::VariadicArgumentsAlreadySet`] if a variadic constraint
    /// is already set.
    pub fn set_variadic_item_constraint(
        &self,
        constraint: impl IntoConstraint,
    ) -> Result<&Self, ContractError> {
        self.claim_variadic()?;
        self.variadic.set_receiver(VariadicItemsConstraint::new(
            constraint,
            expected_count(&self.contract),
        ));
        Ok(self)
    }

    fn claim_variadic(&self) -> Result<(), ContractError> {
        if self.variadic_set.swap(true, Ordering::SeqCst) {
            return Err(ContractError::VariadicArgumentsAlreadySet);
        }
        tracing::debug!(target: "stannum::parameters", "Setting variadic arguments constraint");
        Ok(())
    }

    /// Returns true once a variadic constraint is set.
    pub fn is_variadic(&self) -> bool {
        self.variadic_set.load(Ordering::SeqCst)
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

fn expected_count(contract: &Contract) -> ExpectedCount {
    let weak = contract.downgrade();
    ExpectedCount::from_fn(move || weak.upgrade().map_or(0, |contract| contract.expected_count()))
}

impl Default for ArgumentsContract {
    fn default() -> Self {
        Self::new()
    }
}

delegate_constraint!(ArgumentsContract => contract);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{Constraint, ExtraItemsConstraint, TypeConstraint};
    use crate::kind::ValueKind;
    use crate::path::PathKey;
    use serde_json::json;

    fn required_then_two_defaults() -> ArgumentsContract {
        let contract = ArgumentsContract::new();
        contract
            .add_argument_constraint(None, ValueKind::String, ParameterOptions::new())
            .add_argument_constraint(None, ValueKind::String, ParameterOptions::new().with_default(true))
            .add_argument_constraint(None, ValueKind::String, ParameterOptions::new().with_default(true));
        contract
    }

    #[test]
    fn test_omitted_vs_explicit_null() {
        let contract = required_then_two_defaults();

        let flat = contract.errors_for(&json!([])).to_vec();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, vec![PathKey::index(0)]);

        assert!(contract.validate(&json!(["x"])).is_success());

        let flat = contract.errors_for(&json!(["x", null, null])).to_vec();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].path, vec![PathKey::index(1)]);
        assert_eq!(flat[1].path, vec![PathKey::index(2)]);
    }

    #[test]
    fn test_extra_arguments_without_variadic() {
        let contract = required_then_two_defaults();
        let flat = contract.errors_for(&json!(["a", "b", "c", "d"])).to_vec();

        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].error_type, ExtraItemsConstraint::TYPE);
        assert_eq!(flat[0].path, vec![PathKey::index(3)]);
        assert_eq!(flat[0].data["value"], json!("d"));
    }

    #[test]
    fn test_explicit_index() {
        let contract = ArgumentsContract::new();
        contract.add_argument_constraint(1usize, ValueKind::Integer, ParameterOptions::new());

        assert_eq!(contract.expected_count(), 2);
        assert!(contract.matches(&json!([null, 1])));
        assert!(!contract.matches(&json!([null])));
    }

    #[test]
    fn test_variadic_set_only_once() {
        let contract = ArgumentsContract::new();
        contract.set_variadic_constraint(ValueKind::Array).unwrap();

        let error = contract.set_variadic_item_constraint(ValueKind::String).unwrap_err();
        assert_eq!(error, ContractError::VariadicArgumentsAlreadySet);
        assert_eq!(error.to_string(), "variadic arguments constraint is already set");
        assert!(contract.is_variadic());
    }

    #[test]
    fn test_variadic_rest_constraint_sees_array() {
        let contract = ArgumentsContract::new();
        contract.add_argument_constraint(None, ValueKind::String, ParameterOptions::new());
        contract
            .set_variadic_constraint(crate::constraints::PredicateConstraint::new("too_many", |v| {
                v.as_array().is_some_and(|rest| rest.len() <= 1)
            }))
            .unwrap();

        assert!(contract.matches(&json!(["a", 1])));
        assert!(!contract.matches(&json!(["a", 1, 2])));
    }

    #[test]
    fn test_variadic_items_follow_new_arguments() {
        let contract = ArgumentsContract::new();
        contract.set_variadic_item_constraint(ValueKind::Integer).unwrap();
        contract.add_argument_constraint(None, ValueKind::String, ParameterOptions::new());

        let flat = contract.errors_for(&json!(["a", 1, "b"])).to_vec();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].error_type, TypeConstraint::TYPE);
        assert_eq!(flat[0].path, vec![PathKey::index(2)]);
    }

    #[test]
    fn test_sanity_argument_stops_matching() {
        let contract = ArgumentsContract::new();
        contract
            .add_argument_constraint(None, ValueKind::String, ParameterOptions::new().sanity(true))
            .add_argument_constraint(None, ValueKind::String, ParameterOptions::new());

        let flat = contract.errors_for(&json!([1, 2])).to_vec();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, vec![PathKey::index(0)]);
    }
}
