//! Property-based tests for contracts and error trees.

use proptest::prelude::*;
use serde_json::{json, Value};
use stannum::{
    Anything, Constraint, Contract, Errors, PathKey, PresenceConstraint, TupleContract, ValueKind,
};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_key() -> impl Strategy<Value = PathKey> {
    prop_oneof![
        (0usize..4).prop_map(PathKey::index),
        "[a-c]".prop_map(PathKey::name),
    ]
}

fn arb_errors() -> impl Strategy<Value = Errors> {
    prop::collection::vec(
        (prop::collection::vec(arb_key(), 0..3), "[a-c]"),
        0..6,
    )
    .prop_map(|entries| {
        let mut errors = Errors::new();
        for (path, error_type) in entries {
            errors.dig(path).add(error_type);
        }
        errors
    })
}

proptest! {
    #[test]
    fn empty_contract_is_vacuous(value in arb_json()) {
        let contract = Contract::new();
        prop_assert!(contract.matches(&value));
        prop_assert!(contract.does_not_match(&value));
        prop_assert!(contract.errors_for(&value).is_empty());
    }

    #[test]
    fn anything_matches_everything(value in arb_json()) {
        let contract = Contract::new();
        contract.add_constraint(Anything);
        prop_assert!(contract.validate(&value).is_success());
    }

    #[test]
    fn matches_agrees_with_errors(value in arb_json()) {
        let contract = Contract::new();
        contract
            .add_property_constraint("a", PresenceConstraint)
            .unwrap()
            .add_property_constraint(["b", "c"], ValueKind::Integer)
            .unwrap();

        prop_assert_eq!(contract.matches(&value), contract.errors_for(&value).is_empty());
    }

    #[test]
    fn tuple_reports_each_extra_item(items in prop::collection::vec(any::<i64>(), 0..8)) {
        let tuple = TupleContract::new();
        tuple
            .add_index_constraint(0, ValueKind::Integer)
            .add_index_constraint(1, ValueKind::Integer);

        let extra = items.len().saturating_sub(2);
        let padding = 2usize.saturating_sub(items.len());
        let errors = tuple.errors_for(&json!(items));
        prop_assert_eq!(errors.len(), extra + padding);
    }

    #[test]
    fn adding_twice_is_idempotent(errors in arb_errors()) {
        let mut twice = errors.clone();
        twice.update(&errors);
        prop_assert_eq!(twice.len(), errors.len());
        prop_assert_eq!(&twice, &errors);
    }

    #[test]
    fn merge_does_not_mutate(a in arb_errors(), b in arb_errors()) {
        let before = a.clone();
        let merged = a.merge(&b);

        prop_assert_eq!(&a, &before);
        prop_assert!(merged.len() <= a.len() + b.len());
        prop_assert!(merged.len() >= a.len());
    }

    #[test]
    fn flattening_round_trips_through_update(errors in arb_errors()) {
        let mut rebuilt = Errors::new();
        rebuilt.update_records(errors.iter()).unwrap();
        prop_assert_eq!(rebuilt, errors);
    }
}
