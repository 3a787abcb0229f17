//! Whole-call validation.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::constraints::{
    delegate_constraint, Anything, Constraint, DelegatorConstraint, IntoConstraint, PresenceConstraint,
    TypeConstraint,
};
use crate::contract::{Contract, DefinitionOptions};
use crate::contracts::{ArgumentsContract, KeywordsContract, SignatureContract};
use crate::error::{ContractError, Errors};
use crate::kind::ValueKind;
use crate::validation::ValidationResult;

/// A callable passed along with a call.
#[derive(Clone)]
pub struct Block(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Block {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the block.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Block(..)")
    }
}

/// The parameters of one call: positional arguments, keywords and a block.
///
/// Contracts see a call through [`Parameters::to_value`], where the block is
/// reduced to `true` when present and `null` when absent.
///
/// # Example
///
/// ```rust
/// use stannum::{Block, Parameters};
/// use serde_json::json;
///
/// let call = Parameters::new()
///     .argument("report.csv")
///     .keyword("overwrite", true)
///     .with_block(Block::new(|args| args[0].clone()));
///
/// assert_eq!(
///     call.to_value(),
///     json!({"arguments": ["report.csv"], "keywords": {"overwrite": true}, "block": true})
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    pub arguments: Vec<Value>,
    pub keywords: Map<String, Value>,
    pub block: Option<Block>,
}

impl Parameters {
    /// A call with no arguments, keywords or block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn argument(mut self, value: impl Into<Value>) -> Self {
        self.arguments.push(value.into());
        self
    }

    /// Sets a keyword argument.
    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    /// Passes a block.
    pub fn with_block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    /// Projects the call onto the value matched by contracts.
    pub fn to_value(&self) -> Value {
        json!({
            "arguments": self.arguments,
            "keywords": self.keywords,
            "block": self.block.as_ref().map(|_| true),
        })
    }
}

/// A contract on a whole call.
///
/// The projected call must pass [`SignatureContract`] before anything else
/// is checked. Then arguments, keywords and block are checked by their own
/// contracts and errors land under `arguments`, `keywords` and `block`.
///
/// # Example
///
/// ```rust
/// use stannum::{ParameterOptions, Parameters, ParametersContract, PathKey, ValueKind};
///
/// let contract = ParametersContract::new();
/// contract
///     .arguments()
///     .add_argument_constraint(None, ValueKind::String, ParameterOptions::new());
/// contract.require_block(true).unwrap();
///
/// let errors = contract.errors_for_call(&Parameters::new().argument(42));
/// let paths: Vec<Vec<PathKey>> = errors.iter().map(|e| e.path).collect();
///
/// assert_eq!(
///     paths,
///     vec![
///         vec![PathKey::name("arguments"), PathKey::index(0)],
///         vec![PathKey::name("block")],
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ParametersContract {
    contract: Contract,
    arguments: ArgumentsContract,
    keywords: KeywordsContract,
    block: Arc<DelegatorConstraint>,
    block_set: Arc<AtomicBool>,
}

impl ParametersContract {
    /// Creates a contract for calls with no arguments, no keywords and any block.
    pub fn new() -> Self {
        let arguments = ArgumentsContract::new();
        let keywords = KeywordsContract::new();
        let block = Arc::new(DelegatorConstraint::new(Anything));

        let contract = Contract::new();
        contract
            .add_sanity_constraint(SignatureContract::new())
            .add_unchecked(arguments.clone(), DefinitionOptions::new().key("arguments"))
            .add_unchecked(keywords.clone(), DefinitionOptions::new().key("keywords"))
            .add_unchecked(Arc::clone(&block), DefinitionOptions::new().key("block"));

        Self {
            contract,
            arguments,
            keywords,
            block,
            block_set: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the contract on positional arguments.
    pub fn arguments(&self) -> &ArgumentsContract {
        &self.arguments
    }

    /// Returns the contract on keywords.
    pub fn keywords(&self) -> &KeywordsContract {
        &self.keywords
    }

    /// Applies `constraint` to the block flag (`true` or `null`).
    ///
    /// Fails with [`ContractError::BlockAlreadySet`] if a block constraint is
    /// already set.
    pub fn set_block_constraint(
        &self,
        constraint: impl IntoConstraint,
    ) -> Result<&Self, ContractError> {
        if self.block_set.swap(true, Ordering::SeqCst) {
            return Err(ContractError::BlockAlreadySet);
        }
        tracing::debug!(target: "stannum::parameters", "Setting block constraint");

        self.block.set_receiver(constraint);
        Ok(self)
    }

    /// Requires a block to be passed, or forbids one.
    pub fn require_block(&self, required: bool) -> Result<&Self, ContractError> {
        if required {
            self.set_block_constraint(PresenceConstraint)
        } else {
            self.set_block_constraint(TypeConstraint::new(ValueKind::Null))
        }
    }

    /// Includes another contract's definitions, live.
    pub fn include(&self, other: &Contract) -> Result<&Self, ContractError> {
        self.contract.include(other)?;
        Ok(self)
    }

    /// Returns the underlying contract.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Returns true if the call satisfies the contract.
    pub fn matches_call(&self, parameters: &Parameters) -> bool {
        self.matches(&parameters.to_value())
    }

    /// Returns every error for the call.
    pub fn errors_for_call(&self, parameters: &Parameters) -> Errors {
        self.errors_for(&parameters.to_value())
    }

    /// Matches the call, collecting errors on failure.
    pub fn validate_call(&self, parameters: &Parameters) -> ValidationResult {
        self.validate(&parameters.to_value())
    }
}

impl Default for ParametersContract {
    fn default() -> Self {
        Self::new()
    }
}

delegate_constraint!(ParametersContract => contract);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::ParameterOptions;
    use crate::path::PathKey;
    use serde_json::json;

    #[test]
    fn test_block_projection() {
        let without = Parameters::new();
        assert_eq!(without.to_value()["block"], Value::Null);

        let with = Parameters::new().with_block(Block::new(|_| json!(1)));
        assert_eq!(with.to_value()["block"], json!(true));
        assert_eq!(with.block.as_ref().map(|b| b.call(&[])), Some(json!(1)));
    }

    #[test]
    fn test_empty_contract_accepts_only_empty_calls() {
        let contract = ParametersContract::new();

        assert!(contract.matches_call(&Parameters::new()));
        assert!(contract.matches_call(&Parameters::new().with_block(Block::new(|_| Value::Null))));
        assert!(!contract.matches_call(&Parameters::new().argument(1)));
        assert!(!contract.matches_call(&Parameters::new().keyword("a", 1)));
    }

    #[test]
    fn test_errors_nest_under_part() {
        let contract = ParametersContract::new();
        contract
            .keywords()
            .add_keyword_constraint("mode", ValueKind::String, ParameterOptions::new())
            .unwrap();

        let flat = contract
            .errors_for_call(&Parameters::new().keyword("mode", 1))
            .to_vec();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, vec![PathKey::name("keywords"), PathKey::name("mode")]);
    }

    #[test]
    fn test_forbidden_block() {
        let contract = ParametersContract::new();
        contract.require_block(false).unwrap();

        assert!(contract.validate_call(&Parameters::new()).is_success());
        assert!(contract
            .validate_call(&Parameters::new().with_block(Block::new(|_| Value::Null)))
            .is_failure());
    }

    #[test]
    fn test_block_constraint_set_once() {
        let contract = ParametersContract::new();
        contract.require_block(true).unwrap();

        assert_eq!(
            contract.require_block(false).unwrap_err(),
            ContractError::BlockAlreadySet
        );
    }

    #[test]
    fn test_malformed_call_stops_at_signature() {
        let contract = ParametersContract::new();
        let flat = contract.errors_for(&json!({"arguments": "nope", "keywords": {}, "block": null})).to_vec();

        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, vec![PathKey::name("arguments")]);
        assert_eq!(flat[0].error_type, TypeConstraint::TYPE);
    }
}
