use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::constraints::{
    delegate_constraint, is_symbol_key, DelegatorConstraint, ExpectedKeys, ExtraKeysConstraint, IntoConstraint,
    RestKeysConstraint, SignatureConstraint, SymbolKeysConstraint, VariadicValuesConstraint,
};
use crate::contract::{Contract, DefinitionOptions, Missing};
use crate::contracts::ParameterOptions;
use crate::error::ContractError;

/// A contract on the keyword arguments of a call.
///
/// Works like [`ArgumentsContract`](crate::ArgumentsContract) but by name: a
/// keyword that was not passed resolves to UNDEFINED, and keywords without
/// a constraint are rejected at their name unless a variadic constraint is
/// set. Every key must be a valid keyword name.
///
/// # Example
///
/// ```rust
/// use stannum::{Constraint, KeywordsContract, ParameterOptions, PathKey, ValueKind};
/// use serde_json::json;
///
/// let contract = KeywordsContract::new();
/// contract
///     .add_keyword_constraint("name", ValueKind::String, ParameterOptions::new())
///     .unwrap();
///
/// assert!(contract.matches(&json!({"name": "Alan"})));
///
/// let flat = contract.errors_for(&json!({"name": "Alan", "role": "admin"})).to_vec();
/// assert_eq!(flat[0].error_type, "stannum.constraints.hashes.extra_keys");
/// assert_eq!(flat[0].path, vec![PathKey::name("role")]);
/// ```
#[derive(Debug, Clone)]
pub struct KeywordsContract {
    contract: Contract,
    variadic: Arc<DelegatorConstraint>,
    variadic_set: Arc<AtomicBool>,
}

impl KeywordsContract {
    /// Creates a contract accepting no keywords.
    pub fn new() -> Self {
        let contract = Contract::with_missing(Missing::Undefined);
        contract
            .add_sanity_constraint(SignatureConstraint::map())
            .add_sanity_constraint(SymbolKeysConstraint);

        let variadic = Arc::new(DelegatorConstraint::new(ExtraKeysConstraint::new(
            expected_keys(&contract),
        )));
        contract.add_constraint(Arc::clone(&variadic));

        Self {
            contract,
            variadic,
            variadic_set: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Adds a constraint on the keyword `name`.
    ///
    /// Fails with [`ContractError::InvalidKeyword`] unless `name` is a valid
    /// keyword name.
    pub fn add_keyword_constraint(
        &self,
        name: impl Into<String>,
        constraint: impl IntoConstraint,
        options: ParameterOptions,
    ) -> Result<&Self, ContractError> {
        let name = name.into();
        if !is_symbol_key(&name) {
            return Err(ContractError::InvalidKeyword(name));
        }
        tracing::debug!(target: "stannum::parameters", keyword = %name, "Adding keyword constraint");

        self.contract
            .add_definition(constraint, options.apply(DefinitionOptions::new().key(name)))?;
        Ok(self)
    }

    /// Applies `constraint` to the object of keywords without a constraint.
    ///
    /// Fails with [`ContractError::VariadicKeywordsAlreadySet`] if a variadic
    /// constraint is already set.
    pub fn set_variadic_constraint(
        &self,
        constraint: impl IntoConstraint,
    ) -> Result<&Self, ContractError> {
        self.claim_variadic()?;
        self.variadic
            .set_receiver(RestKeysConstraint::new(constraint, expected_keys(&self.contract)));
        Ok(self)
    }

    /// Applies `constraint` to the value of each keyword without a constraint.
    ///
    /// Errors are reported at each keyword's name. Fails with
    /// [`ContractError::VariadicKeywordsAlreadySet`] if a variadic constraint
    /// is already set.
    pub fn set_variadic_value_constraint(
        &self,
        constraint: impl IntoConstraint,
    ) -> Result<&Self, ContractError> {
        self.claim_variadic()?;
        self.variadic.set_receiver(VariadicValuesConstraint::new(
            constraint,
            expected_keys(&self.contract),
        ));
        Ok(self)
    }

    fn claim_variadic(&self) -> Result<(), ContractError> {
        if self.variadic_set.swap(true, Ordering::SeqCst) {
            return Err(ContractError::VariadicKeywordsAlreadySet);
        }
        tracing::debug!(target: "stannum::parameters", "Setting variadic keywords constraint");
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

    /// Keywords with a constraint.
    pub fn expected_keys(&self) -> Vec<String> {
        self.contract.expected_keys()
    }

    /// Returns the underlying contract.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }
}

fn expected_keys(contract: &Contract) -> ExpectedKeys {
    let weak = contract.downgrade();
    ExpectedKeys::from_fn(move || {
        weak.upgrade()
            .map(|contract| contract.expected_keys())
            .unwrap_or_default()
    })
}

impl Default for KeywordsContract {
    fn default() -> Self {
        Self::new()
    }
}

delegate_constraint!(KeywordsContract => contract);
