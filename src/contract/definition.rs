//! Definitions: one constraint bound to a property of the matched value.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::constraints::{Constraint, IntoConstraint};
use crate::error::ContractError;
use crate::path::{PathKey, PropertyPath};
use crate::validation::{Resolved, NULL};

/// How a definition's property addresses the matched value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyType {
    /// A plain property path, or the whole value.
    #[default]
    None,
    /// A single key of a map.
    Key,
    /// A single position of a tuple.
    Index,
}

/// What a property that is absent from the value resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Missing {
    /// Absent properties read as `null`.
    #[default]
    Null,
    /// Absent properties read as UNDEFINED.
    Undefined,
}

/// Options for a definition added with [`Contract::add_definition`].
///
/// # Example
///
/// ```rust
/// use stannum::{Contract, DefinitionOptions, PresenceConstraint};
/// use serde_json::json;
///
/// let contract = Contract::new();
/// contract
///     .add_definition(
///         PresenceConstraint,
///         DefinitionOptions::new()
///             .property(["user", "name"])
///             .option("label", json!("user name")),
///     )
///     .unwrap();
///
/// let definitions = contract.each_constraint();
/// assert_eq!(definitions[0].property().unwrap().to_string(), "user.name");
/// assert_eq!(definitions[0].option("label"), Some(&json!("user name")));
/// ```
///
/// [`Contract::add_definition`]: crate::Contract::add_definition
#[derive(Debug, Clone, Default)]
pub struct DefinitionOptions {
    property: Option<PropertyPath>,
    property_type: PropertyType,
    sanity: bool,
    default: bool,
    options: Map<String, Value>,
}

impl DefinitionOptions {
    /// Options for a definition on the whole value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the definition to a property path.
    pub fn property(mut self, property: impl Into<PropertyPath>) -> Self {
        self.property = Some(property.into());
        self.property_type = PropertyType::None;
        self
    }

    /// Binds the definition to a single map key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.property = Some(PropertyPath::from_name(key));
        self.property_type = PropertyType::Key;
        self
    }

    /// Binds the definition to a single tuple position.
    pub fn index(mut self, index: usize) -> Self {
        self.property = Some(PropertyPath::from_index(index));
        self.property_type = PropertyType::Index;
        self
    }

    /// Marks the definition as a sanity check.
    pub fn sanity(mut self, sanity: bool) -> Self {
        self.sanity = sanity;
        self
    }

    /// Marks the definition as passing when its value is UNDEFINED.
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Adds a free-form option carried by the definition.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub(crate) fn into_definition(
        self,
        constraint: impl IntoConstraint,
        missing: Missing,
    ) -> Result<Definition, ContractError> {
        if let Some(property) = &self.property {
            check_property(property)?;
        }

        Ok(self.into_definition_unchecked(constraint, missing))
    }

    /// Builds the definition without checking the property.
    ///
    /// Only for options whose property can't be blank.
    pub(crate) fn into_definition_unchecked(
        self,
        constraint: impl IntoConstraint,
        missing: Missing,
    ) -> Definition {
        Definition {
            constraint: constraint.into_constraint(),
            property: self.property,
            property_type: self.property_type,
            sanity: self.sanity,
            default: self.default,
            options: self.options,
            missing,
        }
    }
}

fn check_property(property: &PropertyPath) -> Result<(), ContractError> {
    if property.is_empty() {
        return Err(ContractError::InvalidProperty(
            "property path can't be empty".to_string(),
        ));
    }
    match property.keys().find(|key| matches!(key, PathKey::Name(name) if name.trim().is_empty())) {
        Some(_) => Err(ContractError::InvalidProperty(format!(
            "property name can't be blank in {:?}",
            property.to_string()
        ))),
        None => Ok(()),
    }
}

/// A constraint bound to a property of the matched value.
#[derive(Clone)]
pub struct Definition {
    constraint: Arc<dyn Constraint>,
    property: Option<PropertyPath>,
    property_type: PropertyType,
    sanity: bool,
    default: bool,
    options: Map<String, Value>,
    missing: Missing,
}

impl Definition {
    /// Returns the constraint.
    pub fn constraint(&self) -> &Arc<dyn Constraint> {
        &self.constraint
    }

    /// Returns the property path, or None for the whole value.
    pub fn property(&self) -> Option<&PropertyPath> {
        self.property.as_ref()
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn is_sanity(&self) -> bool {
        self.sanity
    }

    pub fn is_default(&self) -> bool {
        self.default
    }

    /// Returns the free-form options.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Returns one free-form option.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Resolves the definition's property against `actual`.
    ///
    /// Each step reads an object field by name or an array item by index; any
    /// other step makes the property absent.
    pub fn resolve<'a>(&self, actual: &'a Value) -> Resolved<'a> {
        let Some(property) = &self.property else {
            return Resolved::Value(actual);
        };
        match (property.resolve(actual), self.missing) {
            (Some(value), _) => Resolved::Value(value),
            (None, Missing::Null) => Resolved::Value(&NULL),
            (None, Missing::Undefined) => Resolved::Undefined,
        }
    }

    /// Returns the index of a tuple-position definition.
    pub(crate) fn index(&self) -> Option<usize> {
        match (self.property_type, self.property.as_ref().and_then(|p| p.last())) {
            (PropertyType::Index, Some(PathKey::Index(index))) => Some(*index),
            _ => None,
        }
    }

    /// Returns the key of a map-key definition.
    pub(crate) fn key(&self) -> Option<&str> {
        match (self.property_type, self.property.as_ref().and_then(|p| p.last())) {
            (PropertyType::Key, Some(PathKey::Name(name))) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("error_type", &self.constraint.error_type())
            .field("property", &self.property.as_ref().map(|p| p.to_string()))
            .field("property_type", &self.property_type)
            .field("sanity", &self.sanity)
            .field("default", &self.default)
            .field("options", &self.options)
            .finish()
    }
}
