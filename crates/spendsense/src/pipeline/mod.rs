//! Purchase decision pipeline: validation, rule evaluation, scoring, reasoning and report
//! assembly.

pub mod domain;
pub mod evaluation;
pub mod import;
pub mod orchestrator;
pub mod reasoning;
pub mod report;
pub mod router;
pub mod scoring;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ConfidenceScore, Explanation, FinancialFacts, HardStopReason, PurchaseItem, PurchaseRequest,
    RawPurchaseItem, RawPurchaseRequest, ReasoningMode, RiskLevel, ScoreBand,
};
pub use evaluation::{ArithmeticError, RiskThresholds, RuleEvaluator, RuleOutcome};
pub use import::{items_from_csv, items_from_csv_path, ImportError};
pub use orchestrator::{DecisionOrchestrator, EvaluationOptions, PipelineError, PipelineStage};
pub use reasoning::{
    ExternalServiceError, FallbackReasoner, ReasoningAdapter, ReasoningRequest, ReasoningResult,
    ReasoningService, RemoteReasoningClient, ADVICE_DISCLAIMER,
};
pub use report::{DecisionReport, DecisionReportView, FailureReportView, RECOMMENDATION_DISCLAIMER};
pub use router::decision_router;
pub use scoring::{ConfidenceScorer, ScoreBands};
pub use validation::{InputValidator, ValidationError, ValidationPolicy};
