use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::domain::{
    ConfidenceScore, Explanation, FinancialFacts, PurchaseItem, PurchaseRequest, ReasoningMode,
    RiskLevel, ScoreBand,
};

/// Fixed informational disclaimer attached to every decision.
pub const RECOMMENDATION_DISCLAIMER: &str = "This is an informational analysis only and not \
financial advice. Review the explanation and decide what is right for your situation.";

const PERCENTAGE_DECIMALS: u32 = 2;

/// Complete outcome of one evaluation. Only ever built once every stage has succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionReport {
    pub request: PurchaseRequest,
    pub facts: FinancialFacts,
    pub risk: RiskLevel,
    pub hard_stop_detail: Option<String>,
    pub score: ConfidenceScore,
    pub explanation: Explanation,
    pub next_steps: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl DecisionReport {
    pub fn can_afford(&self) -> bool {
        !self.risk.is_hard_stop()
    }

    /// Whether the rule classification and the score band agree. Neither overrides the other.
    pub fn classification_agreement(&self) -> bool {
        self.score.band.agrees_with(self.risk)
    }

    /// Percentage of disposable income rounded for display.
    pub fn display_percentage(&self) -> Option<Decimal> {
        self.facts.percentage_of_disposable.map(|pct| {
            pct.round_dp_with_strategy(PERCENTAGE_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
                .normalize()
        })
    }

    pub fn summary(&self) -> String {
        summary_for(self.risk, &self.request.purchase_label())
    }

    pub fn view(&self) -> DecisionReportView {
        let percentage = self.display_percentage();
        DecisionReportView {
            status: "success",
            generated_at: self.generated_at,
            financial_analysis: FinancialAnalysisView {
                monthly_income: self.facts.monthly_income,
                fixed_expenses: self.facts.fixed_expenses,
                savings_goal: self.facts.savings_goal,
                disposable_income: self.facts.disposable_income,
                total_cost: self.facts.total_cost,
                hard_stop_triggered: self.risk.is_hard_stop(),
                hard_stop_reason: self.risk.hard_stop_reason().map(|reason| reason.code()),
                hard_stop_detail: self.hard_stop_detail.clone(),
                remaining_after_purchase: self.facts.remaining_after_purchase,
                can_afford: self.can_afford(),
                items: self.request.items().to_vec(),
            },
            risk_assessment: RiskAssessmentView {
                risk_level: self.risk.code(),
                risk_label: self.risk.label(),
                confidence_score: self.score.value,
                percentage_of_disposable: percentage,
                score_band: self.score.band,
                score_color: self.score.band.color(),
                classification_agreement: self.classification_agreement(),
            },
            ai_reasoning: ReasoningView {
                explanation: self.explanation.text.clone(),
                alternatives: self.explanation.alternatives.clone(),
                mode: self.explanation.mode,
            },
            final_decision: FinalDecisionView {
                summary: self.summary(),
                recommendation: RECOMMENDATION_DISCLAIMER,
                key_metrics: KeyMetricsView {
                    monthly_income: self.facts.monthly_income,
                    disposable_income: self.facts.disposable_income,
                    total_cost: self.facts.total_cost,
                    remaining_after_purchase: self.facts.remaining_after_purchase,
                    percentage_of_disposable: percentage,
                },
                next_steps: self.next_steps.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionReportView {
    pub status: &'static str,
    pub generated_at: DateTime<Utc>,
    pub financial_analysis: FinancialAnalysisView,
    pub risk_assessment: RiskAssessmentView,
    pub ai_reasoning: ReasoningView,
    pub final_decision: FinalDecisionView,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialAnalysisView {
    pub monthly_income: Decimal,
    pub fixed_expenses: Decimal,
    pub savings_goal: Decimal,
    pub disposable_income: Decimal,
    pub total_cost: Decimal,
    pub hard_stop_triggered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_stop_reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_stop_detail: Option<String>,
    pub remaining_after_purchase: Decimal,
    pub can_afford: bool,
    pub items: Vec<PurchaseItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessmentView {
    pub risk_level: &'static str,
    pub risk_label: &'static str,
    pub confidence_score: Decimal,
    /// `null` when there is no disposable income to divide by.
    pub percentage_of_disposable: Option<Decimal>,
    pub score_band: ScoreBand,
    pub score_color: &'static str,
    pub classification_agreement: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasoningView {
    pub explanation: String,
    pub alternatives: Vec<String>,
    pub mode: ReasoningMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalDecisionView {
    pub summary: String,
    pub recommendation: &'static str,
    pub key_metrics: KeyMetricsView,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyMetricsView {
    pub monthly_income: Decimal,
    pub disposable_income: Decimal,
    pub total_cost: Decimal,
    pub remaining_after_purchase: Decimal,
    pub percentage_of_disposable: Option<Decimal>,
}

/// Error counterpart of [`DecisionReportView`]; never carries success sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReportView {
    pub status: &'static str,
    pub error: String,
    pub error_kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Canned next steps, one list per risk level.
pub fn next_steps_for(risk: RiskLevel) -> Vec<String> {
    let steps: &[&str] = match risk {
        RiskLevel::Low => &[
            "Confirm this purchase fits your priorities",
            "Compare prices before buying",
            "Keep tracking your monthly budget",
        ],
        RiskLevel::Medium => &[
            "Review whether this is a need or a want",
            "Compare prices and look for discounts",
            "Check how this affects your other goals this month",
            "Consider waiting a few days before deciding",
        ],
        RiskLevel::High => &[
            "Pause and reassess whether this purchase is essential",
            "Look for lower-cost alternatives",
            "Consider saving for this over several months",
            "Review your budget before committing",
        ],
        RiskLevel::HardStop { .. } => &[
            "Do not rely on this month's budget for this purchase",
            "Review your fixed expenses and savings goal",
            "Explore lower-cost alternatives or delay the purchase",
            "Reassess once your disposable income can absorb the cost",
        ],
    };

    steps.iter().map(|step| step.to_string()).collect()
}

fn summary_for(risk: RiskLevel, label: &str) -> String {
    match risk {
        RiskLevel::Low => format!(
            "{label} is a low-risk purchase relative to your disposable income."
        ),
        RiskLevel::Medium => format!(
            "{label} is a medium-risk purchase that uses a noticeable share of your disposable income."
        ),
        RiskLevel::High => format!(
            "{label} is a high-risk purchase that would use most of your disposable income."
        ),
        RiskLevel::HardStop { reason } => format!(
            "{label} cannot be covered by this month's budget ({}).",
            reason.code()
        ),
    }
}
