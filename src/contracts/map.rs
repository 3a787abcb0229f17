use crate::constraints::{delegate_constraint, ExpectedKeys, ExtraKeysConstraint, IntoConstraint, SignatureConstraint};
use crate::contract::{Contract, DefinitionOptions};
use crate::error::ContractError;

/// A contract on an object, key by key.
///
/// Values that are not map-like fail the sanity check. Unless built with
/// [`allowing_extra_keys`](MapContract::allowing_extra_keys), keys without
/// a definition are reported at that key.
///
/// # Example
///
/// ```rust
/// use stannum::{Constraint, MapContract, PathKey, ValueKind};
/// use serde_json::json;
///
/// let contract = MapContract::new();
/// contract.add_key_constraint("name", ValueKind::String).unwrap();
///
/// assert!(contract.matches(&json!({"name": "Alan"})));
///
/// let flat = contract.errors_for(&json!({"name": "Alan", "age": 41})).to_vec();
/// assert_eq!(flat[0].error_type, "stannum.constraints.hashes.extra_keys");
/// assert_eq!(flat[0].path, vec![PathKey::name("age")]);
/// ```
#[derive(Debug, Clone)]
pub struct MapContract {
    contract: Contract,
}

impl MapContract {
    /// Creates a map contract that rejects extra keys.
    pub fn new() -> Self {
        let map = Self::allowing_extra_keys();
        let weak = map.contract.downgrade();
        map.contract
            .add_constraint(ExtraKeysConstraint::new(ExpectedKeys::from_fn(move || {
                weak.upgrade()
                    .map(|contract| contract.expected_keys())
                    .unwrap_or_default()
            })));
        map
    }

    /// Creates a map contract that ignores extra keys.
    pub fn allowing_extra_keys() -> Self {
        let contract = Contract::new();
        contract.add_sanity_constraint(SignatureConstraint::map());
        Self { contract }
    }

    /// Adds a constraint on the value at `key`.
    ///
    /// Fails with [`ContractError::InvalidProperty`] if the key is blank.
    pub fn add_key_constraint(
        &self,
        key: impl Into<String>,
        constraint: impl IntoConstraint,
    ) -> Result<&Self, ContractError> {
        self.contract
            .add_definition(constraint, DefinitionOptions::new().key(key))?;
        Ok(self)
    }

    /// Includes another contract's definitions, live.
    pub fn include(&self, other: &Contract) -> Result<&Self, ContractError> {
        self.contract.include(other)?;
        Ok(self)
    }

    /// Keys with a definition.
    pub fn expected_keys(&self) -> Vec<String> {
        self.contract.expected_keys()
    }

    /// Returns the underlying contract.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }
}

impl Default for MapContract {
    fn default() -> Self {
        Self::new()
    }
}

delegate_constraint!(MapContract => contract);
