//! Contracts with a fixed shape: tuples, maps and call parameters.
//!
//! Each of these wraps a [`Contract`](crate::Contract) that it preconfigures
//! with sanity checks and an extra-items or extra-keys policy. The wrapped
//! contract is available through `contract()` and can include others.

mod arguments;
mod keywords;
mod map;
mod parameters;
mod signature;
mod tuple;

use serde_json::{Map, Value};

use crate::contract::DefinitionOptions;

pub use arguments::ArgumentsContract;
pub use keywords::KeywordsContract;
pub use map::MapContract;
pub use parameters::{Block, Parameters, ParametersContract};
pub use signature::SignatureContract;
pub use tuple::TupleContract;

/// Options for an argument or keyword constraint.
///
/// # Example
///
/// ```rust
/// use stannum::{ArgumentsContract, Constraint, ParameterOptions, ValueKind};
/// use serde_json::json;
///
/// let contract = ArgumentsContract::new();
/// contract
///     .add_argument_constraint(None, ValueKind::String, ParameterOptions::new())
///     .add_argument_constraint(None, ValueKind::Integer, ParameterOptions::new().with_default(true));
///
/// assert!(contract.matches(&json!(["name"])));
/// assert!(contract.matches(&json!(["name", 3])));
/// assert!(!contract.matches(&json!(["name", null])));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParameterOptions {
    default: bool,
    sanity: bool,
    options: Map<String, Value>,
}

impl ParameterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets the parameter be omitted. An explicit `null` is still checked.
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Stops matching when this parameter fails.
    pub fn sanity(mut self, sanity: bool) -> Self {
        self.sanity = sanity;
        self
    }

    /// Adds a free-form option carried by the definition.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub(crate) fn apply(self, definition: DefinitionOptions) -> DefinitionOptions {
        self.options.into_iter().fold(
            definition.with_default(self.default).sanity(self.sanity),
            |definition, (key, value)| definition.option(key, value),
        )
    }
}
