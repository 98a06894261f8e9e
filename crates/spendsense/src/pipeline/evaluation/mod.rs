mod config;
mod rules;

pub use config::RiskThresholds;
pub use rules::ArithmeticError;

use super::domain::{FinancialFacts, PurchaseRequest, RiskLevel};
use serde::Serialize;
use tracing::debug;

/// Stateless evaluator applying the budgeting rules to a validated request.
#[derive(Debug, Clone, Default)]
pub struct RuleEvaluator {
    thresholds: RiskThresholds,
}

impl RuleEvaluator {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Derive the financial facts and the rule-based risk level. Identical requests always
    /// yield identical outcomes.
    pub fn evaluate(&self, request: &PurchaseRequest) -> Result<RuleOutcome, ArithmeticError> {
        let facts = rules::derive_facts(request)?;
        let risk = rules::classify(&facts, &self.thresholds);

        debug!(risk = risk.code(), "rules evaluated");

        Ok(RuleOutcome { facts, risk })
    }
}

/// Facts plus the classification they produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub facts: FinancialFacts,
    pub risk: RiskLevel,
}

impl RuleOutcome {
    pub fn hard_stop_detail(&self) -> Option<String> {
        self.risk
            .hard_stop_reason()
            .map(|reason| reason.detail(&self.facts))
    }
}
