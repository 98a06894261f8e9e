use super::common::*;
use rust_decimal_macros::dec;
use serde_json::json;

use crate::pipeline::validation::{InputValidator, ValidationError, ValidationPolicy};

#[test]
fn negative_income_is_rejected_against_monthly_income() {
    let raw = raw_request(-5000.0, 1500.0, 500.0, 1200.0);

    let err = InputValidator::default().validate(&raw).unwrap_err();

    assert_eq!(err.field(), "monthly_income");
    assert!(matches!(err, ValidationError::Negative { .. }));
}

#[test]
fn zero_income_is_not_positive() {
    let raw = raw_request(0.0, 0.0, 0.0, 10.0);

    let err = InputValidator::default().validate(&raw).unwrap_err();

    assert_eq!(
        err,
        ValidationError::NotPositive {
            field: "monthly_income".to_string(),
            value: dec!(0),
        }
    );
}

#[test]
fn missing_fields_are_reported_in_order() {
    let raw = raw_json(json!({ "monthly_income": 5000, "items": [] }));

    let err = InputValidator::default().validate(&raw).unwrap_err();

    assert_eq!(
        err,
        ValidationError::Missing {
            field: "fixed_expenses".to_string()
        }
    );
}

#[test]
fn non_numeric_values_are_rejected() {
    let raw = raw_json(json!({
        "monthly_income": "five thousand",
        "fixed_expenses": 0,
        "savings_goal": 0,
        "items": [{ "name": "Laptop", "cost": 10 }],
    }));
    let err = InputValidator::default().validate(&raw).unwrap_err();
    assert!(matches!(err, ValidationError::NotNumeric { .. }));
    assert_eq!(err.field(), "monthly_income");

    let raw = raw_json(json!({
        "monthly_income": 5000,
        "fixed_expenses": true,
        "savings_goal": 0,
        "items": [{ "name": "Laptop", "cost": 10 }],
    }));
    let err = InputValidator::default().validate(&raw).unwrap_err();
    assert_eq!(
        err,
        ValidationError::NotNumeric {
            field: "fixed_expenses".to_string(),
            found: "boolean",
        }
    );

    let raw = raw_json(json!({
        "monthly_income": 5000,
        "fixed_expenses": 0,
        "savings_goal": 0,
        "items": [{ "name": "Laptop", "cost": "1_000" }],
    }));
    let err = InputValidator::default().validate(&raw).unwrap_err();
    assert_eq!(
        err,
        ValidationError::NotNumeric {
            field: "items[0].cost".to_string(),
            found: "non-numeric string",
        }
    );
}

#[test]
fn negative_savings_goal_is_rejected() {
    let raw = raw_request(5000.0, 1500.0, -1.0, 100.0);
    let err = InputValidator::default().validate(&raw).unwrap_err();
    assert_eq!(err.field(), "savings_goal");
}

#[test]
fn empty_item_list_is_rejected() {
    let raw = raw_json(json!({
        "monthly_income": 5000,
        "fixed_expenses": 1500,
        "savings_goal": 500,
        "items": [],
    }));

    let err = InputValidator::default().validate(&raw).unwrap_err();

    assert_eq!(
        err,
        ValidationError::NoItems {
            field: "items".to_string()
        }
    );
}

#[test]
fn item_errors_name_the_item_index() {
    let raw = raw_json(json!({
        "monthly_income": 5000,
        "fixed_expenses": 1500,
        "savings_goal": 500,
        "items": [
            { "name": "Laptop", "cost": 1200 },
            { "name": "Dock", "cost": -5 },
        ],
    }));
    let err = InputValidator::default().validate(&raw).unwrap_err();
    assert_eq!(err.field(), "items[1].cost");

    let raw = raw_json(json!({
        "monthly_income": 5000,
        "fixed_expenses": 1500,
        "savings_goal": 500,
        "items": [{ "name": "   ", "cost": 10 }],
    }));
    let err = InputValidator::default().validate(&raw).unwrap_err();
    assert_eq!(
        err,
        ValidationError::EmptyName {
            field: "items[0].name".to_string()
        }
    );
}

#[test]
fn zero_cost_item_is_rejected() {
    let raw = raw_request(5000.0, 1500.0, 500.0, 0.0);
    let err = InputValidator::default().validate(&raw).unwrap_err();
    assert!(matches!(err, ValidationError::NotPositive { .. }));
    assert_eq!(err.field(), "items[0].cost");
}

#[test]
fn item_names_respect_the_length_limit() {
    let at_limit = "a".repeat(200);
    let over_limit = "a".repeat(201);
    let validator = InputValidator::default();

    let ok = raw_json(json!({
        "monthly_income": 5000, "fixed_expenses": 0, "savings_goal": 0,
        "items": [{ "name": at_limit, "cost": 10 }],
    }));
    assert!(validator.validate(&ok).is_ok());

    let too_long = raw_json(json!({
        "monthly_income": 5000, "fixed_expenses": 0, "savings_goal": 0,
        "items": [{ "name": over_limit, "cost": 10 }],
    }));
    assert_eq!(
        validator.validate(&too_long).unwrap_err(),
        ValidationError::NameTooLong {
            field: "items[0].name".to_string(),
            max: 200,
            length: 201,
        }
    );
}

#[test]
fn custom_policy_tightens_the_name_limit() {
    let validator = InputValidator::with_policy(ValidationPolicy::new(5));
    let raw = raw_request(5000.0, 0.0, 0.0, 10.0);

    let err = validator.validate(&raw).unwrap_err();

    assert!(matches!(err, ValidationError::NameTooLong { max: 5, .. }));
}

#[test]
fn valid_request_sums_items_exactly() {
    let raw = raw_json(json!({
        "monthly_income": "5000.10",
        "fixed_expenses": 1500,
        "savings_goal": "500.05",
        "items": [
            { "name": " Laptop ", "cost": "0.1" },
            { "name": "Dock", "cost": "0.2" },
        ],
    }));

    let request = InputValidator::default().validate(&raw).expect("valid");

    assert_eq!(request.monthly_income(), dec!(5000.10));
    assert_eq!(request.savings_goal(), dec!(500.05));
    assert_eq!(request.total_cost(), dec!(0.3));
    assert_eq!(request.items()[0].name, "Laptop");
    assert_eq!(request.purchase_label(), "Laptop, Dock");
}

#[test]
fn legacy_planned_purchase_is_normalized_to_one_item() {
    let raw = raw_json(json!({
        "monthly_income": 5000,
        "fixed_expenses": 1500,
        "savings_goal": 500,
        "planned_purchase": { "item": "Headphones", "cost": 250 },
    }));

    let request = InputValidator::default().validate(&raw).expect("valid");

    assert_eq!(request.items().len(), 1);
    assert_eq!(request.items()[0].name, "Headphones");
    assert_eq!(request.total_cost(), dec!(250));
}

#[test]
fn legacy_errors_use_legacy_field_paths() {
    let raw = raw_json(json!({
        "monthly_income": 5000,
        "fixed_expenses": 1500,
        "savings_goal": 500,
        "planned_purchase": { "item": "Headphones" },
    }));

    let err = InputValidator::default().validate(&raw).unwrap_err();

    assert_eq!(
        err,
        ValidationError::Missing {
            field: "planned_purchase.cost".to_string()
        }
    );
}

#[test]
fn missing_items_and_planned_purchase_is_reported() {
    let raw = raw_json(json!({
        "monthly_income": 5000,
        "fixed_expenses": 1500,
        "savings_goal": 500,
    }));

    let err = InputValidator::default().validate(&raw).unwrap_err();

    assert_eq!(err.field(), "items");
}
