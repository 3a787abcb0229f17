//! # Stannum
//!
//! Composable runtime constraints that report every failure as a typed,
//! path-addressed error record instead of stopping at the first one.
//!
//! ## Overview
//!
//! A [`Constraint`] is a predicate over a single `serde_json::Value` that can
//! explain why a value failed it. A [`Contract`] binds constraints to property
//! paths of a value and is itself a constraint, so contracts nest and include
//! each other. Failures accumulate in an [`Errors`] tree, and matching results
//! are stillwater `Validation`s carrying that tree.
//!
//! ## Core Types
//!
//! - [`Constraint`]: the matching abstraction, with leaf kinds such as
//!   [`TypeConstraint`], [`PresenceConstraint`] and [`SignatureConstraint`]
//! - [`Contract`]: an ordered, live aggregate of [`Definition`]s
//! - [`Errors`]: a deduplicating error tree that flattens to [`FlatError`]s
//! - [`ArgumentsContract`], [`KeywordsContract`] and [`ParametersContract`]:
//!   contracts on call parameters that tell an omitted argument apart from an
//!   explicit `null`
//!
//! ## Example
//!
//! ```rust
//! use stannum::{Constraint, Contract, PathKey, PresenceConstraint, ValueKind};
//! use serde_json::json;
//!
//! let contract = Contract::new();
//! contract.add_property_constraint("name", ValueKind::String).unwrap();
//! contract.add_property_constraint(["address", "city"], PresenceConstraint).unwrap();
//!
//! let result = contract.validate(&json!({"name": "Ada", "address": {"city": "London"}}));
//! assert!(result.is_success());
//!
//! let errors = contract.errors_for(&json!({"name": 1, "address": {}}));
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors.to_vec()[1].path, vec![PathKey::name("address"), PathKey::name("city")]);
//! ```

pub mod constraints;
pub mod contract;
pub mod contracts;
pub mod error;
pub mod kind;
pub mod path;
pub mod registry;
pub mod validation;

pub use constraints::{
    Anything, Capability, Constraint, DelegatorConstraint, ExpectedCount, ExpectedKeys,
    ExtraItemsConstraint, ExtraKeysConstraint, IntoConstraint, Nothing, PredicateConstraint,
    PresenceConstraint, RestItemsConstraint, RestKeysConstraint, SignatureConstraint,
    SymbolKeysConstraint, TypeConstraint, VariadicItemsConstraint, VariadicValuesConstraint,
};
pub use contract::{Contract, Definition, DefinitionOptions, PropertyType, WeakContract};
pub use contracts::{
    ArgumentsContract, Block, KeywordsContract, MapContract, ParameterOptions, Parameters,
    ParametersContract, SignatureContract, TupleContract,
};
pub use error::{
    ContractError, DefaultMessages, ErrorRecord, Errors, ErrorsAssignment, FlatError,
    MessageStrategy,
};
pub use kind::ValueKind;
pub use path::{PathKey, PropertyPath};
pub use registry::{TypeDescriptor, TypeRef, TypeRegistry, BLOCK_TYPE};
pub use validation::{Resolved, ValidationResult, UNDEFINED};
