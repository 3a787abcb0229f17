//! Tests for type registry operations and named type references.

use serde_json::json;
use stannum::{
    Constraint, Contract, ContractError, TypeConstraint, TypeDescriptor, TypeRef, TypeRegistry,
    BLOCK_TYPE,
};

fn email() -> TypeDescriptor {
    TypeDescriptor::new("Email", |v| v.as_str().is_some_and(|s| s.contains('@')))
}

#[test]
fn test_register_and_get() {
    let registry = TypeRegistry::new();
    registry.register(email()).unwrap();

    assert!(registry.get("Email").is_some());
    assert!(registry.get("Missing").is_none());
    assert!(registry.contains("Email"));
}

#[test]
fn test_duplicate_registration_fails() {
    let registry = TypeRegistry::new();
    registry.register(email()).unwrap();

    assert_eq!(
        registry.register(email()).unwrap_err(),
        ContractError::DuplicateType("Email".to_string())
    );
}

#[test]
fn test_forward_reference_binds_once_registered() {
    let registry = TypeRegistry::new();
    let reference = TypeRef::named_in("Email", &registry);

    let contract = Contract::new();
    contract
        .add_property_constraint("contact", TypeConstraint::new(reference.clone()))
        .unwrap();

    // Unregistered names match nothing.
    assert!(!contract.matches(&json!({"contact": "a@b.c"})));
    assert!(!reference.is_resolved());

    registry.register(email()).unwrap();
    assert!(contract.matches(&json!({"contact": "a@b.c"})));
    assert!(!contract.matches(&json!({"contact": "nobody"})));
    assert!(reference.is_resolved());
}

#[test]
fn test_type_errors_carry_name() {
    let registry = TypeRegistry::new();
    registry.register(email()).unwrap();

    let constraint = TypeConstraint::new(TypeRef::named_in("Email", &registry));
    let flat = constraint.errors_for(&json!(42)).to_vec();

    assert_eq!(flat[0].error_type, TypeConstraint::TYPE);
    assert_eq!(flat[0].data["type"], json!("Email"));
    assert_eq!(flat[0].data["required"], json!(true));
}

#[test]
fn test_global_registry_has_builtins() {
    let global = TypeRegistry::global();

    assert!(global.contains("String"));
    assert!(global.contains("Integer"));

    let block = global.get(BLOCK_TYPE).unwrap();
    assert!(block.is_instance(&json!(true)));
    assert!(!block.is_instance(&json!(false)));
    assert!(!block.is_instance(&json!(null)));
}

#[test]
fn test_registry_clones_share_storage() {
    let registry = TypeRegistry::new();
    let clone = registry.clone();

    clone.register(email()).unwrap();
    assert!(registry.contains("Email"));
}
