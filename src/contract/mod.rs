//! Contracts: ordered aggregates of constraints bound to properties.
//!
//! A [`Contract`] is a shared handle. Cloning it, or including it in another
//! contract, never copies its definitions, so a constraint added later is seen
//! by every contract that includes it.

mod definition;

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::Value;
use stillwater::Validation;

use crate::constraints::{Constraint, IntoConstraint};
use crate::error::{ContractError, Errors};
use crate::path::PropertyPath;
use crate::validation::{Resolved, ValidationResult};

pub use definition::{Definition, DefinitionOptions, PropertyType};
pub(crate) use definition::Missing;

#[derive(Default)]
struct ContractState {
    definitions: Vec<Arc<Definition>>,
    included: Vec<Contract>,
    missing: Missing,
}

/// An ordered, composable aggregate of constraints.
///
/// Matching walks every definition (those of included contracts first), with
/// sanity definitions moved to the front. A failing sanity definition stops
/// the walk; other failures are all collected, each at the property path of
/// its definition.
///
/// A contract with no definitions (own or included) both matches and does not
/// match every value.
///
/// # Example
///
/// ```rust
/// use stannum::{Constraint, Contract, PathKey, PresenceConstraint};
/// use serde_json::json;
///
/// let contract = Contract::new();
/// contract
///     .add_property_constraint(["manufacturer", "factory", "address"], PresenceConstraint)
///     .unwrap();
///
/// let errors = contract.errors_for(&json!({"manufacturer": {"factory": {}}}));
/// let flat = errors.to_vec();
///
/// assert_eq!(flat[0].error_type, "stannum.constraints.absent");
/// assert_eq!(
///     flat[0].path,
///     vec![PathKey::name("manufacturer"), PathKey::name("factory"), PathKey::name("address")]
/// );
/// ```
#[derive(Clone, Default)]
pub struct Contract {
    state: Arc<RwLock<ContractState>>,
}

/// A non-owning reference to a [`Contract`].
#[derive(Clone)]
pub struct WeakContract {
    state: Weak<RwLock<ContractState>>,
}

impl WeakContract {
    /// Returns the contract if it is still alive.
    pub fn upgrade(&self) -> Option<Contract> {
        self.state.upgrade().map(|state| Contract { state })
    }
}

impl Contract {
    /// Creates an empty contract.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_missing(missing: Missing) -> Self {
        let contract = Self::new();
        contract.state.write().missing = missing;
        contract
    }

    /// Adds a constraint on the whole value.
    pub fn add_constraint(&self, constraint: impl IntoConstraint) -> &Self {
        self.add_unchecked(constraint, DefinitionOptions::new())
    }

    /// Adds a sanity constraint on the whole value.
    pub(crate) fn add_sanity_constraint(&self, constraint: impl IntoConstraint) -> &Self {
        self.add_unchecked(constraint, DefinitionOptions::new().sanity(true))
    }

    /// Adds a definition whose property is known to be well formed.
    pub(crate) fn add_unchecked(
        &self,
        constraint: impl IntoConstraint,
        options: DefinitionOptions,
    ) -> &Self {
        let missing = self.state.read().missing;
        self.push_definition(options.into_definition_unchecked(constraint, missing));
        self
    }

    /// Adds a constraint on a property of the value.
    ///
    /// Fails with [`ContractError::InvalidProperty`] if the path is empty or
    /// has a blank name.
    pub fn add_property_constraint(
        &self,
        property: impl Into<PropertyPath>,
        constraint: impl IntoConstraint,
    ) -> Result<&Self, ContractError> {
        self.add_definition(constraint, DefinitionOptions::new().property(property))
    }

    /// Adds a constraint with explicit options.
    pub fn add_definition(
        &self,
        constraint: impl IntoConstraint,
        options: DefinitionOptions,
    ) -> Result<&Self, ContractError> {
        let missing = self.state.read().missing;
        let definition = options.into_definition(constraint, missing)?;
        self.push_definition(definition);
        Ok(self)
    }

    fn push_definition(&self, definition: Definition) {
        tracing::trace!(
            target: "stannum::contract",
            property = ?definition.property().map(|p| p.to_string()),
            sanity = definition.is_sanity(),
            default = definition.is_default(),
            "Adding definition"
        );
        self.state.write().definitions.push(Arc::new(definition));
    }

    /// Includes another contract's definitions, live.
    ///
    /// Fails with [`ContractError::RecursiveInclude`] if `other` is this
    /// contract or already includes it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stannum::{Constraint, Contract, ValueKind};
    /// use serde_json::json;
    ///
    /// let shared = Contract::new();
    /// let contract = Contract::new();
    /// contract.include(&shared).unwrap();
    ///
    /// assert!(contract.matches(&json!(1)));
    ///
    /// shared.add_constraint(ValueKind::String);
    /// assert!(!contract.matches(&json!(1)));
    /// ```
    pub fn include(&self, other: &Contract) -> Result<&Self, ContractError> {
        if self.ptr_eq(other) || other.includes(self) {
            return Err(ContractError::RecursiveInclude);
        }

        self.state.write().included.push(other.clone());
        tracing::debug!(target: "stannum::contract", "Included contract");
        Ok(self)
    }

    /// Returns true if `other` is included, directly or transitively.
    pub fn includes(&self, other: &Contract) -> bool {
        self.each_included()
            .iter()
            .any(|included| included.ptr_eq(other) || included.includes(other))
    }

    /// Returns the directly included contracts.
    pub fn each_included(&self) -> Vec<Contract> {
        self.state.read().included.clone()
    }

    /// Returns every definition in matching order.
    ///
    /// Definitions of included contracts come first, depth first, then this
    /// contract's own. Sanity definitions are then moved to the front,
    /// keeping their relative order.
    pub fn each_constraint(&self) -> Vec<Arc<Definition>> {
        let mut definitions = Vec::new();
        self.collect_definitions(&mut definitions);

        let (mut sanity, rest): (Vec<_>, Vec<_>) =
            definitions.into_iter().partition(|d| d.is_sanity());
        sanity.extend(rest);
        sanity
    }

    fn collect_definitions(&self, out: &mut Vec<Arc<Definition>>) {
        let (included, own) = {
            let state = self.state.read();
            (state.included.clone(), state.definitions.clone())
        };
        for contract in &included {
            contract.collect_definitions(out);
        }
        out.extend(own);
    }

    /// Pairs every definition with its resolved value, in matching order.
    pub fn each_pair<'a>(&self, actual: &'a Value) -> Vec<(Arc<Definition>, Resolved<'a>)> {
        self.each_constraint()
            .into_iter()
            .map(|definition| {
                let resolved = definition.resolve(actual);
                (definition, resolved)
            })
            .collect()
    }

    /// Returns true if there are no definitions, own or included.
    pub fn is_empty(&self) -> bool {
        let (included, has_own) = {
            let state = self.state.read();
            (state.included.clone(), !state.definitions.is_empty())
        };
        !has_own && included.iter().all(Contract::is_empty)
    }

    /// One past the highest tuple position with a definition, or 0.
    pub fn expected_count(&self) -> usize {
        self.each_constraint()
            .iter()
            .filter_map(|d| d.index())
            .max()
            .map_or(0, |index| index + 1)
    }

    /// Map keys with a definition, in matching order.
    pub fn expected_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for definition in self.each_constraint() {
            if let Some(key) = definition.key() {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
        }
        keys
    }

    /// Returns true if both handles share the same contract.
    pub fn ptr_eq(&self, other: &Contract) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Returns a non-owning handle.
    pub fn downgrade(&self) -> WeakContract {
        WeakContract {
            state: Arc::downgrade(&self.state),
        }
    }

    fn evaluate(&self, actual: &Value, mut errors: Option<&mut Errors>) -> bool {
        let mut status = true;

        for (definition, resolved) in self.each_pair(actual) {
            if definition.is_default() && resolved.is_undefined() {
                continue;
            }

            let value = resolved.value_or_null();
            let constraint = definition.constraint();
            if constraint.matches(value) {
                continue;
            }

            status = false;
            tracing::trace!(
                target: "stannum::contract",
                error_type = %constraint.error_type(),
                property = ?definition.property().map(|p| p.to_string()),
                "Definition did not match"
            );
            match errors.as_deref_mut() {
                Some(errors) => constraint.update_errors_for(value, scoped(errors, &definition)),
                None => return false,
            }
            if definition.is_sanity() {
                tracing::debug!(
                    target: "stannum::contract",
                    error_type = %constraint.error_type(),
                    "Sanity check failed; skipping remaining definitions"
                );
                return false;
            }
        }

        status
    }

    fn evaluate_negated(&self, actual: &Value, mut errors: Option<&mut Errors>) -> bool {
        let mut status = true;

        for (definition, resolved) in self.each_pair(actual) {
            if definition.is_default() && resolved.is_undefined() {
                continue;
            }

            let value = resolved.value_or_null();
            let constraint = definition.constraint();
            if definition.is_sanity() {
                // Sanity definitions come first, so status is still true here.
                if constraint.does_not_match(value) {
                    tracing::debug!(
                        target: "stannum::contract",
                        error_type = %constraint.error_type(),
                        "Value fails sanity check; does not match"
                    );
                    return true;
                }
                if let Some(errors) = errors.as_deref_mut() {
                    constraint.update_negated_errors_for(value, scoped(errors, &definition));
                }
                return false;
            }
            if constraint.does_not_match(value) {
                continue;
            }

            status = false;
            match errors.as_deref_mut() {
                Some(errors) => {
                    constraint.update_negated_errors_for(value, scoped(errors, &definition))
                }
                None => return false,
            }
        }

        status
    }
}

fn scoped<'e>(errors: &'e mut Errors, definition: &Definition) -> &'e mut Errors {
    match definition.property() {
        Some(property) => errors.dig_path(property),
        None => errors,
    }
}

impl Constraint for Contract {
    fn matches(&self, actual: &Value) -> bool {
        self.evaluate(actual, None)
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        self.evaluate_negated(actual, None)
    }

    fn update_errors_for(&self, actual: &Value, errors: &mut Errors) {
        self.evaluate(actual, Some(errors));
    }

    fn update_negated_errors_for(&self, actual: &Value, errors: &mut Errors) {
        self.evaluate_negated(actual, Some(errors));
    }

    fn validate(&self, actual: &Value) -> ValidationResult {
        let mut errors = Errors::new();
        if self.evaluate(actual, Some(&mut errors)) {
            Validation::Success(())
        } else {
            Validation::Failure(errors)
        }
    }

    fn validate_negated(&self, actual: &Value) -> ValidationResult {
        let mut errors = Errors::new();
        if self.evaluate_negated(actual, Some(&mut errors)) {
            Validation::Success(())
        } else {
            Validation::Failure(errors)
        }
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Contract")
            .field("definitions", &state.definitions)
            .field("included", &state.included.len())
            .finish()
    }
}
