use super::common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pipeline::domain::{HardStopReason, RiskLevel};
use crate::pipeline::evaluation::{RiskThresholds, RuleEvaluator};

fn risk_for(income: &str, expenses: &str, savings: &str, cost: &str) -> RiskLevel {
    RuleEvaluator::default()
        .evaluate(&validated(income, expenses, savings, cost))
        .expect("evaluates")
        .risk
}

#[test]
fn medium_risk_scenario_derives_exact_facts() {
    let outcome = RuleEvaluator::default()
        .evaluate(&validated("5000", "1500", "500", "1200"))
        .expect("evaluates");

    assert_eq!(outcome.facts.disposable_income, dec!(3000));
    assert_eq!(outcome.facts.percentage_of_disposable, Some(dec!(40)));
    assert_eq!(outcome.facts.remaining_after_purchase, dec!(1800));
    assert_eq!(outcome.risk, RiskLevel::Medium);
    assert_eq!(outcome.hard_stop_detail(), None);
}

#[test]
fn low_risk_scenario() {
    assert_eq!(risk_for("6000", "2000", "1000", "800"), RiskLevel::Low);
}

#[test]
fn disposable_income_has_no_rounding_drift() {
    let outcome = RuleEvaluator::default()
        .evaluate(&validated("5000.10", "1500.03", "500.07", "1"))
        .expect("evaluates");

    assert_eq!(outcome.facts.disposable_income, dec!(3000.00));
}

#[test]
fn negative_disposable_income_hard_stops_regardless_of_cost() {
    let outcome = RuleEvaluator::default()
        .evaluate(&validated("3000", "2800", "500", "2000"))
        .expect("evaluates");

    assert_eq!(outcome.facts.disposable_income, dec!(-300));
    assert_eq!(outcome.facts.percentage_of_disposable, None);
    assert_eq!(
        outcome.risk,
        RiskLevel::HardStop {
            reason: HardStopReason::InsufficientDisposableIncome
        }
    );
    assert!(outcome
        .hard_stop_detail()
        .expect("detail present")
        .contains("no disposable income"));

    assert_eq!(
        risk_for("3000", "2800", "500", "0.01"),
        RiskLevel::HardStop {
            reason: HardStopReason::InsufficientDisposableIncome
        }
    );
}

#[test]
fn zero_disposable_income_hard_stops() {
    assert_eq!(
        risk_for("3000", "2000", "1000", "1"),
        RiskLevel::HardStop {
            reason: HardStopReason::InsufficientDisposableIncome
        }
    );
}

#[test]
fn cost_at_or_above_income_hard_stops() {
    let expected = RiskLevel::HardStop {
        reason: HardStopReason::CostExceedsIncome,
    };
    assert_eq!(risk_for("1500", "0", "0", "1500"), expected);
    assert_eq!(risk_for("1500", "100", "0", "2000"), expected);

    let outcome = RuleEvaluator::default()
        .evaluate(&validated("1500", "0", "0", "2000"))
        .expect("evaluates");
    assert_eq!(
        outcome.hard_stop_detail().as_deref(),
        Some("purchase cost (2000.00) meets or exceeds monthly income (1500.00)")
    );
}

#[test]
fn percentage_tiers_are_inclusive_on_the_lower_tier() {
    // disposable income is 10000 so cost / 100 is the percentage
    assert_eq!(risk_for("20000", "10000", "0", "3000"), RiskLevel::Low);
    assert_eq!(risk_for("20000", "10000", "0", "3001"), RiskLevel::Medium);
    assert_eq!(risk_for("20000", "10000", "0", "6000"), RiskLevel::Medium);
    assert_eq!(risk_for("20000", "10000", "0", "6001"), RiskLevel::High);
}

#[test]
fn classification_is_monotonic_in_cost() {
    let ordinal = |risk: RiskLevel| match risk {
        RiskLevel::Low => 0,
        RiskLevel::Medium => 1,
        RiskLevel::High => 2,
        RiskLevel::HardStop { .. } => 3,
    };

    let mut previous = 0;
    for cost in (100..=20000).step_by(100) {
        let risk = risk_for("20000", "10000", "0", &cost.to_string());
        let current = ordinal(risk);
        assert!(current >= previous, "cost {cost} lowered the risk level");
        previous = current;
    }
}

#[test]
fn custom_thresholds_shift_the_tiers() {
    let evaluator = RuleEvaluator::new(RiskThresholds {
        low_ceiling_pct: dec!(10),
        medium_ceiling_pct: dec!(20),
    });

    let outcome = evaluator
        .evaluate(&validated("5000", "1500", "500", "1200"))
        .expect("evaluates");

    assert_eq!(outcome.risk, RiskLevel::High);
}

#[test]
fn hard_stops_hold_for_amounts_near_the_decimal_limit() {
    assert_eq!(
        risk_for(
            "70000000000000000000000000000",
            "0",
            "0",
            "75000000000000000000000000000"
        ),
        RiskLevel::HardStop {
            reason: HardStopReason::CostExceedsIncome
        }
    );

    let outcome = RuleEvaluator::default()
        .evaluate(&validated(
            "1",
            "70000000000000000000000000000",
            "70000000000000000000000000000",
            "1",
        ))
        .expect("evaluates");
    assert_eq!(
        outcome.risk,
        RiskLevel::HardStop {
            reason: HardStopReason::InsufficientDisposableIncome
        }
    );
    assert_eq!(outcome.facts.disposable_income, Decimal::MIN);
    assert_eq!(outcome.facts.percentage_of_disposable, None);
}

#[test]
fn large_amounts_fall_back_to_dividing_first() {
    let outcome = RuleEvaluator::default()
        .evaluate(&validated(
            "2000000000000000000000000000",
            "0",
            "0",
            "1000000000000000000000000000",
        ))
        .expect("evaluates");

    assert_eq!(outcome.facts.percentage_of_disposable, Some(dec!(50)));
    assert_eq!(outcome.risk, RiskLevel::Medium);
}

#[test]
fn unrepresentable_share_is_an_error() {
    let income = Decimal::MAX.to_string();
    let expenses = (Decimal::MAX - Decimal::ONE).to_string();
    let request = validated(&income, &expenses, "0", "1000000000000000000000000000");

    let err = RuleEvaluator::default().evaluate(&request).unwrap_err();
    assert_eq!(err.quantity, "percentage of disposable income");
}

#[test]
fn evaluation_is_idempotent() {
    let request = validated("5000", "1500", "500", "1200");
    let evaluator = RuleEvaluator::default();

    let first = evaluator.evaluate(&request).expect("evaluates");
    let second = evaluator.evaluate(&request).expect("evaluates");

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
}
