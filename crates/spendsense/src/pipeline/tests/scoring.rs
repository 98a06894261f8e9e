use super::common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pipeline::domain::{RiskLevel, ScoreBand};
use crate::pipeline::evaluation::RuleEvaluator;
use crate::pipeline::scoring::{raw_score, ConfidenceScorer};

fn score_for(income: &str, expenses: &str, savings: &str, cost: &str) -> (RiskLevel, Decimal, ScoreBand) {
    let outcome = RuleEvaluator::default()
        .evaluate(&validated(income, expenses, savings, cost))
        .expect("evaluates");
    let score = ConfidenceScorer::default().score(&outcome.facts);
    (outcome.risk, score.value, score.band)
}

#[test]
fn medium_scenario_scores_at_the_band_edge() {
    let (risk, value, band) = score_for("5000", "1500", "500", "1200");

    assert_eq!(risk, RiskLevel::Medium);
    assert_eq!(value, dec!(0.4));
    assert_eq!(band, ScoreBand::Medium);
    assert!(band.agrees_with(risk));
}

#[test]
fn low_scenario_scores_low() {
    let (_, value, band) = score_for("6000", "2000", "1000", "800");

    assert_eq!(value, dec!(0.267));
    assert_eq!(band, ScoreBand::Low);
}

#[test]
fn hard_stop_scores_never_fail() {
    let (risk, value, band) = score_for("3000", "2800", "500", "2000");

    assert!(risk.is_hard_stop());
    assert_eq!(value, Decimal::ONE);
    assert_eq!(band, ScoreBand::High);
    assert!(band.agrees_with(risk));
}

#[test]
fn bands_can_disagree_with_rules() {
    // 65% of disposable income is HIGH by rule but MEDIUM by score
    let (risk, value, band) = score_for("20000", "10000", "0", "6500");

    assert_eq!(risk, RiskLevel::High);
    assert_eq!(value, dec!(0.65));
    assert_eq!(band, ScoreBand::Medium);
    assert!(!band.agrees_with(risk));
}

#[test]
fn score_stays_in_unit_interval() {
    for (cost, disposable) in [
        (dec!(0.01), dec!(100000)),
        (dec!(5000), dec!(1)),
        (dec!(5000), dec!(-10000)),
        (dec!(0.5), dec!(0)),
        (dec!(999999999), dec!(0.5)),
    ] {
        let value = raw_score(cost, disposable);
        assert!(value >= Decimal::ZERO && value <= Decimal::ONE, "{cost}/{disposable}");
    }
}

#[test]
fn score_is_a_pure_function_of_cost_and_disposable_income() {
    let first = raw_score(dec!(1234.56), dec!(4321.09));
    let second = raw_score(dec!(1234.56), dec!(4321.09));

    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}
