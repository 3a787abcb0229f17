//! Tests for sharing contracts and registries across threads.

use serde_json::json;
use stannum::{
    Constraint, Contract, ParameterOptions, Parameters, ParametersContract, PresenceConstraint,
    TypeConstraint, TypeDescriptor, TypeRef, TypeRegistry, ValueKind,
};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_matching() {
    let contract = Contract::new();
    contract
        .add_property_constraint("name", ValueKind::String)
        .unwrap()
        .add_property_constraint("age", ValueKind::Integer)
        .unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let contract = contract.clone();
            thread::spawn(move || {
                let value = json!({"name": format!("User{}", i), "age": 20 + i});
                assert!(contract.validate(&value).is_success());
                assert_eq!(contract.errors_for(&json!({"age": "x"})).len(), 2);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_call_matching() {
    let contract = Arc::new(ParametersContract::new());
    contract
        .arguments()
        .add_argument_constraint(None, ValueKind::Integer, ParameterOptions::new());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let contract = Arc::clone(&contract);
            thread::spawn(move || {
                assert!(contract.matches_call(&Parameters::new().argument(i)));
                assert!(!contract.matches_call(&Parameters::new().argument("x")));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_registration_and_lookup() {
    let registry = TypeRegistry::new();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                registry
                    .register(TypeDescriptor::new(format!("Type{}", i), |v| v.is_string()))
                    .unwrap();
                assert!(registry.get(&format!("Type{}", i)).is_some());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..10 {
        assert!(registry.contains(&format!("Type{}", i)));
    }
}

#[test]
fn test_concurrent_lazy_binding() {
    let registry = TypeRegistry::new();
    registry
        .register(TypeDescriptor::new("Tag", |v| v.as_str().is_some_and(|s| s.starts_with('#'))))
        .unwrap();

    let constraint = Arc::new(TypeConstraint::new(TypeRef::named_in("Tag", &registry)));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let constraint = Arc::clone(&constraint);
            thread::spawn(move || {
                assert!(constraint.matches(&json!("#rust")));
                assert!(constraint.expected().is_resolved());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_adding_definitions_while_matching() {
    let contract = Contract::new();
    contract.add_property_constraint("id", ValueKind::Integer).unwrap();

    let reader = {
        let contract = contract.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                // Present keys satisfy every definition that may be added.
                assert!(contract.matches(&json!({"id": 1, "name": "x"})));
            }
        })
    };

    for _ in 0..10 {
        contract.add_property_constraint("name", PresenceConstraint).unwrap();
    }

    reader.join().unwrap();
}
