use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;

use super::super::domain::{
    Explanation, FinancialFacts, HardStopReason, ReasoningMode, RiskLevel,
};
use super::{ExternalServiceError, ReasoningRequest, ReasoningResult, ReasoningService};

const GENERAL_ALTERNATIVES: [&str; 3] = [
    "Wait 30 days and reassess whether you still want it",
    "Look for a lower-cost substitute, or a used or refurbished version",
    "Look for sales, coupons, or discount codes",
];

const ELEVATED_ALTERNATIVES: [&str; 3] = [
    "Consider a budget-friendly alternative brand",
    "Explore renting or borrowing instead of buying",
    "Set aside a fixed amount each month and revisit the purchase later",
];

const HARD_STOP_ALTERNATIVES: [&str; 3] = [
    "Wait and reassess once your disposable income can absorb this cost",
    "Look for a lower-cost substitute",
    "Split the purchase into smaller items that can be evaluated separately",
];

/// Deterministic template-based explanations, one template per risk level.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackReasoner;

impl FallbackReasoner {
    /// Never fails; always yields non-empty text and at least one alternative.
    pub fn explain(&self, input: &ReasoningRequest<'_>) -> Explanation {
        Explanation {
            text: explanation_text(input.facts, input.risk),
            alternatives: alternatives_for(input.risk),
            mode: ReasoningMode::Fallback,
        }
    }
}

#[async_trait]
impl ReasoningService for FallbackReasoner {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn generate(
        &self,
        input: &ReasoningRequest<'_>,
    ) -> Result<ReasoningResult, ExternalServiceError> {
        let explanation = self.explain(input);
        Ok(ReasoningResult {
            decision: input.risk.code().to_string(),
            confidence_score: input.score.value.to_f64().unwrap_or(1.0),
            explanation: explanation.text,
            alternatives: explanation.alternatives,
        })
    }
}

pub(crate) fn alternatives_for(risk: RiskLevel) -> Vec<String> {
    let selected: Vec<&str> = match risk {
        RiskLevel::Low => GENERAL_ALTERNATIVES.to_vec(),
        RiskLevel::Medium | RiskLevel::High => GENERAL_ALTERNATIVES
            .iter()
            .chain(ELEVATED_ALTERNATIVES.iter())
            .copied()
            .collect(),
        RiskLevel::HardStop { .. } => HARD_STOP_ALTERNATIVES.to_vec(),
    };

    selected.into_iter().map(str::to_string).collect()
}

fn share_phrase(facts: &FinancialFacts) -> String {
    match facts.percentage_of_disposable {
        Some(pct) => format!(
            "This {:.2} purchase represents {:.1}% of your disposable income ({:.2}).",
            facts.total_cost, pct, facts.disposable_income
        ),
        None if facts.has_disposable_income() => format!(
            "This {:.2} purchase is many times larger than your disposable income ({:.2}).",
            facts.total_cost, facts.disposable_income
        ),
        None => format!(
            "This {:.2} purchase has no disposable income to draw on (disposable income {:.2}).",
            facts.total_cost, facts.disposable_income
        ),
    }
}

fn explanation_text(facts: &FinancialFacts, risk: RiskLevel) -> String {
    let opening = share_phrase(facts);

    let body = match risk {
        RiskLevel::Low => "Based on the rule-based assessment this is a Low Risk purchase: it is small \
relative to the money left after fixed expenses and your savings goal. A low rating is not a reason \
to buy automatically. Consider:
- Do you need this item?
- Is there a more affordable alternative?
- Could you wait and save for it?

The decision that fits your situation is yours to make."
            .to_string(),
        RiskLevel::Medium => "Based on the rule-based assessment this is a Medium Risk purchase: it is a \
noticeable portion of the money left after fixed expenses and your savings goal. Before deciding, consider:
- Is this a need or a want?
- Have you budgeted for this category?
- Could you find the item at a lower cost?
- Would it affect your other financial goals?

Take time to make a careful, informed decision."
            .to_string(),
        RiskLevel::High => "Based on the rule-based assessment this is a High Risk purchase: it would use \
most of the money left after fixed expenses and your savings goal, which could materially reduce your \
financial flexibility this month. Consider:
- Is this a critical need right now?
- Could you delay this purchase?
- Is there a more affordable alternative?
- What would it mean for your savings and other goals?

Think carefully before committing."
            .to_string(),
        RiskLevel::HardStop { reason } => {
            let cause = match reason {
                HardStopReason::InsufficientDisposableIncome => {
                    "Your fixed expenses and savings goal already use all of your monthly income, \
so any purchase would come out of savings or require new debt."
                }
                HardStopReason::CostExceedsIncome => {
                    "The total cost meets or exceeds a full month of income, so it cannot be covered \
from a single month's budget."
                }
            };
            format!(
                "The rule-based assessment stopped before tiering this purchase ({}): {}.\n\n{}\n\n\
This is the most severe outcome the assessment produces. Review the alternatives and decide what is \
right for your situation.",
                reason.code(),
                reason.detail(facts),
                cause
            )
        }
    };

    format!("{opening}\n\n{body}")
}
