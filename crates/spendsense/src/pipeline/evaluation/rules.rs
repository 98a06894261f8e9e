use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::super::domain::{FinancialFacts, HardStopReason, PurchaseRequest, RiskLevel};
use super::config::RiskThresholds;

/// Checked decimal arithmetic failed while deriving facts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("arithmetic overflow while computing {quantity}")]
pub struct ArithmeticError {
    pub quantity: &'static str,
}

fn overflow(quantity: &'static str) -> ArithmeticError {
    ArithmeticError { quantity }
}

pub(crate) fn derive_facts(request: &PurchaseRequest) -> Result<FinancialFacts, ArithmeticError> {
    let monthly_income = request.monthly_income();
    let fixed_expenses = request.fixed_expenses();
    let savings_goal = request.savings_goal();
    let total_cost = request.total_cost();

    // Inputs are non-negative, so a failed subtraction only ever falls below the minimum.
    let disposable_income = monthly_income
        .checked_sub(fixed_expenses)
        .and_then(|value| value.checked_sub(savings_goal))
        .unwrap_or(Decimal::MIN);
    let remaining_after_purchase = disposable_income.saturating_sub(total_cost);

    let percentage_of_disposable = if disposable_income <= Decimal::ZERO {
        None
    } else if total_cost >= monthly_income {
        share_of(total_cost, disposable_income)
    } else {
        let share = share_of(total_cost, disposable_income)
            .ok_or_else(|| overflow("percentage of disposable income"))?;
        Some(share)
    };

    Ok(FinancialFacts {
        monthly_income,
        fixed_expenses,
        savings_goal,
        total_cost,
        disposable_income,
        percentage_of_disposable,
        remaining_after_purchase,
    })
}

/// `cost / disposable * 100`, scaling first when that stays in range.
fn share_of(total_cost: Decimal, disposable_income: Decimal) -> Option<Decimal> {
    total_cost
        .checked_mul(dec!(100))
        .and_then(|scaled| scaled.checked_div(disposable_income))
        .or_else(|| {
            total_cost
                .checked_div(disposable_income)
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
        })
}

/// Ordered rules, first match wins: no disposable income, cost at or above income, then
/// the percentage tiers.
pub(crate) fn classify(facts: &FinancialFacts, thresholds: &RiskThresholds) -> RiskLevel {
    if facts.disposable_income <= Decimal::ZERO {
        return RiskLevel::HardStop {
            reason: HardStopReason::InsufficientDisposableIncome,
        };
    }

    if facts.total_cost >= facts.monthly_income {
        return RiskLevel::HardStop {
            reason: HardStopReason::CostExceedsIncome,
        };
    }

    match facts.percentage_of_disposable {
        Some(pct) if pct <= thresholds.low_ceiling_pct => RiskLevel::Low,
        Some(pct) if pct <= thresholds.medium_ceiling_pct => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}
