//! Type descriptors and the registry that binds type names lazily.
//!
//! A type constraint can name its expected type instead of holding it, which
//! lets contracts refer to types that are registered later. The name is looked
//! up in a [`TypeRegistry`] the first time it is needed and the binding is
//! kept from then on.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::ContractError;
use crate::kind::ValueKind;

/// Name under which the call-block flag type is registered.
pub const BLOCK_TYPE: &str = "Block";

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A named nominal type: a name plus a membership test.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    predicate: Predicate,
}

impl TypeDescriptor {
    /// Creates a descriptor from a membership test.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Creates a descriptor for a built-in value kind.
    pub fn kind(kind: ValueKind) -> Self {
        Self::new(kind.name(), move |value| kind.is_instance(value))
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if `value` is an instance of this type.
    pub fn is_instance(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor").field("name", &self.name).finish()
    }
}

type TypeMap = Arc<RwLock<HashMap<String, Arc<TypeDescriptor>>>>;

static GLOBAL: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::with_builtins);

/// A thread-safe store of named types.
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use stannum::{TypeDescriptor, TypeRegistry};
/// use serde_json::json;
///
/// let registry = TypeRegistry::new();
/// registry
///     .register(TypeDescriptor::new("Email", |v| v.as_str().is_some_and(|s| s.contains('@'))))
///     .unwrap();
///
/// let email = registry.get("Email").unwrap();
/// assert!(email.is_instance(&json!("a@b.c")));
///
/// // Duplicate registration fails
/// assert!(registry.register(TypeDescriptor::new("Email", |_| true)).is_err());
/// ```
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: TypeMap,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every [`ValueKind`] plus the `"Block"` type.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        {
            let mut types = registry.types.write();
            for kind in ValueKind::ALL {
                types.insert(kind.name().to_string(), Arc::new(TypeDescriptor::kind(kind)));
            }
            types.insert(
                BLOCK_TYPE.to_string(),
                Arc::new(TypeDescriptor::new(BLOCK_TYPE, |value| value == &Value::Bool(true))),
            );
        }
        registry
    }

    /// Returns the process-wide registry, created on first use.
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    /// Registers a type under its name.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::DuplicateType` if the name is taken.
    pub fn register(&self, descriptor: TypeDescriptor) -> Result<(), ContractError> {
        let mut types = self.types.write();
        if types.contains_key(descriptor.name()) {
            return Err(ContractError::DuplicateType(descriptor.name().to_string()));
        }
        tracing::debug!(target: "stannum::types", name = %descriptor.name(), "Registered type");
        types.insert(descriptor.name().to_string(), Arc::new(descriptor));
        Ok(())
    }

    /// Looks a type up by name.
    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.read().get(name).cloned()
    }

    /// Returns true if a type with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }
}

/// A reference to a type: either bound already or a name bound on first use.
#[derive(Clone)]
pub enum TypeRef {
    /// A concrete descriptor.
    Resolved(Arc<TypeDescriptor>),
    /// A name looked up in `registry` (the global one when None) once.
    Named {
        name: String,
        registry: Option<TypeRegistry>,
        binding: Arc<OnceCell<Arc<TypeDescriptor>>>,
    },
}

impl TypeRef {
    /// Refers to a type by name in the global registry.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            registry: None,
            binding: Arc::new(OnceCell::new()),
        }
    }

    /// Refers to a type by name in the given registry.
    pub fn named_in(name: impl Into<String>, registry: &TypeRegistry) -> Self {
        TypeRef::Named {
            name: name.into(),
            registry: Some(registry.clone()),
            binding: Arc::new(OnceCell::new()),
        }
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Resolved(descriptor) => descriptor.name(),
            TypeRef::Named { name, .. } => name,
        }
    }

    /// Returns the descriptor, binding a named reference on first success.
    ///
    /// A name that is not registered yet stays unbound, so a later call can
    /// still succeed once the type is registered.
    pub fn resolve(&self) -> Option<Arc<TypeDescriptor>> {
        match self {
            TypeRef::Resolved(descriptor) => Some(Arc::clone(descriptor)),
            TypeRef::Named {
                name,
                registry,
                binding,
            } => binding
                .get_or_try_init(|| {
                    let registry = registry.as_ref().unwrap_or_else(|| TypeRegistry::global());
                    registry.get(name).ok_or(())
                })
                .ok()
                .map(Arc::clone),
        }
    }

    /// Returns true once the reference is bound to a descriptor.
    pub fn is_resolved(&self) -> bool {
        match self {
            TypeRef::Resolved(_) => true,
            TypeRef::Named { binding, .. } => binding.get().is_some(),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name()).finish()
    }
}

impl From<ValueKind> for TypeRef {
    fn from(kind: ValueKind) -> Self {
        TypeRef::Resolved(Arc::new(TypeDescriptor::kind(kind)))
    }
}

impl From<TypeDescriptor> for TypeRef {
    fn from(descriptor: TypeDescriptor) -> Self {
        TypeRef::Resolved(Arc::new(descriptor))
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::named(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::named(name)
    }
}
