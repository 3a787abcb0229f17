//! Integration tests for argument, keyword and whole-call contracts.

use serde_json::{json, Value};
use stannum::{
    ArgumentsContract, Block, Constraint, ContractError, ExtraItemsConstraint,
    ExtraKeysConstraint, KeywordsContract, ParameterOptions, Parameters, ParametersContract,
    PathKey, PresenceConstraint, SignatureConstraint, TypeConstraint, ValueKind,
};

fn paths(errors: &stannum::Errors) -> Vec<Vec<PathKey>> {
    errors.iter().map(|e| e.path).collect()
}

#[test]
fn test_omitted_arguments_differ_from_null() {
    let contract = ArgumentsContract::new();
    contract
        .add_argument_constraint(None, PresenceConstraint, ParameterOptions::new())
        .add_argument_constraint(None, PresenceConstraint, ParameterOptions::new().with_default(true))
        .add_argument_constraint(None, PresenceConstraint, ParameterOptions::new().with_default(true));

    assert_eq!(paths(&contract.errors_for(&json!([]))), vec![vec![PathKey::index(0)]]);

    assert!(contract.matches(&json!(["x"])));

    let errors = contract.errors_for(&json!(["x", null, null]));
    assert_eq!(
        paths(&errors),
        vec![vec![PathKey::index(1)], vec![PathKey::index(2)]]
    );
}

#[test]
fn test_extra_arguments_are_rejected() {
    let contract = ArgumentsContract::new();
    contract.add_argument_constraint(None, ValueKind::String, ParameterOptions::new());

    let flat = contract.errors_for(&json!(["a", "b", "c"])).to_vec();
    assert_eq!(flat.len(), 2);
    assert!(flat.iter().all(|e| e.error_type == ExtraItemsConstraint::TYPE));
    assert_eq!(flat[0].path, vec![PathKey::index(1)]);
}

#[test]
fn test_explicit_positions() {
    let contract = ArgumentsContract::new();
    contract
        .add_argument_constraint(1usize, ValueKind::Integer, ParameterOptions::new())
        .add_argument_constraint(None, ValueKind::Boolean, ParameterOptions::new());

    assert_eq!(contract.expected_count(), 3);
    assert!(contract.matches(&json!(["anything", 1, true])));
}

#[test]
fn test_variadic_arguments() {
    let contract = ArgumentsContract::new();
    contract.add_argument_constraint(None, ValueKind::String, ParameterOptions::new());
    contract.set_variadic_item_constraint(ValueKind::Integer).unwrap();
    assert!(contract.is_variadic());

    assert!(contract.matches(&json!(["sum"])));
    assert!(contract.matches(&json!(["sum", 1, 2, 3])));

    let flat = contract.errors_for(&json!(["sum", 1, "two", 3])).to_vec();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].error_type, TypeConstraint::TYPE);
    assert_eq!(flat[0].path, vec![PathKey::index(2)]);

    assert_eq!(
        contract.set_variadic_constraint(ValueKind::Array).unwrap_err(),
        ContractError::VariadicArgumentsAlreadySet
    );
}

#[test]
fn test_keywords() {
    let contract = KeywordsContract::new();
    contract
        .add_keyword_constraint("path", ValueKind::String, ParameterOptions::new())
        .unwrap()
        .add_keyword_constraint(
            "overwrite",
            ValueKind::Boolean,
            ParameterOptions::new().with_default(true),
        )
        .unwrap();

    assert!(contract.matches(&json!({"path": "out.csv"})));
    assert!(contract.matches(&json!({"path": "out.csv", "overwrite": false})));
    assert!(!contract.matches(&json!({"path": "out.csv", "overwrite": null})));

    let flat = contract.errors_for(&json!({"path": "out.csv", "mode": "w"})).to_vec();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].error_type, ExtraKeysConstraint::TYPE);
    assert_eq!(flat[0].path, vec![PathKey::name("mode")]);

    assert_eq!(contract.expected_keys(), vec!["path", "overwrite"]);
}

#[test]
fn test_keyword_names_must_be_symbols() {
    let contract = KeywordsContract::new();

    for name in ["", "1st", "with space", "dash-ed"] {
        assert!(matches!(
            contract.add_keyword_constraint(name, ValueKind::String, ParameterOptions::new()),
            Err(ContractError::InvalidKeyword(_))
        ));
    }
    for name in ["ok", "_private", "valid?", "save!"] {
        assert!(contract
            .add_keyword_constraint(name, ValueKind::String, ParameterOptions::new())
            .is_ok());
    }
}

#[test]
fn test_whole_call() {
    let contract = ParametersContract::new();
    contract
        .arguments()
        .add_argument_constraint(None, ValueKind::String, ParameterOptions::new());
    contract
        .keywords()
        .add_keyword_constraint("retries", ValueKind::Integer, ParameterOptions::new().with_default(true))
        .unwrap();
    contract.require_block(true).unwrap();

    let call = Parameters::new()
        .argument("fetch")
        .keyword("retries", 3)
        .with_block(Block::new(|args| args.first().cloned().unwrap_or(Value::Null)));
    assert!(contract.matches_call(&call));
    assert!(contract.validate_call(&call).is_success());

    let bad = Parameters::new().argument(1).keyword("retries", "many");
    assert_eq!(
        paths(&contract.errors_for_call(&bad)),
        vec![
            vec![PathKey::name("arguments"), PathKey::index(0)],
            vec![PathKey::name("keywords"), PathKey::name("retries")],
            vec![PathKey::name("block")],
        ]
    );
}

#[test]
fn test_parts_added_after_construction_are_seen() {
    let contract = ParametersContract::new();
    assert!(!contract.matches_call(&Parameters::new().argument(1)));

    contract
        .arguments()
        .add_argument_constraint(None, ValueKind::Integer, ParameterOptions::new());
    assert!(contract.matches_call(&Parameters::new().argument(1)));
}

#[test]
fn test_block_rules() {
    let forbidding = ParametersContract::new();
    forbidding.require_block(false).unwrap();

    let with_block = Parameters::new().with_block(Block::new(|_| json!(null)));
    let flat = forbidding.errors_for_call(&with_block).to_vec();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].path, vec![PathKey::name("block")]);

    assert_eq!(
        forbidding.require_block(true).unwrap_err(),
        ContractError::BlockAlreadySet
    );
}

#[test]
fn test_shared_rules_via_include() {
    let common = stannum::Contract::new();
    let contract = ParametersContract::new();
    contract.include(&common).unwrap();

    common
        .add_property_constraint(["keywords", "user"], PresenceConstraint)
        .unwrap();

    let flat = contract.errors_for_call(&Parameters::new()).to_vec();
    assert_eq!(flat.len(), 1);
    assert_eq!(
        flat[0].path,
        vec![PathKey::name("keywords"), PathKey::name("user")]
    );
}

#[test]
fn test_keywords_with_partial_shape_fail_both_ways() {
    let contract = KeywordsContract::new();
    let text = json!("abc");

    assert!(!contract.matches(&text));
    assert!(!contract.does_not_match(&text));

    let flat = contract.negated_errors_for(&text).to_vec();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].error_type, SignatureConstraint::NEGATED_TYPE);

    // A well-formed keyword map is never a non-match.
    assert!(contract.matches(&json!({})));
    assert!(!contract.does_not_match(&json!({})));
}
