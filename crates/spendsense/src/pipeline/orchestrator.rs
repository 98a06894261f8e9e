use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::RawPurchaseRequest;
use super::evaluation::{ArithmeticError, RiskThresholds, RuleEvaluator};
use super::reasoning::{ExternalServiceError, ReasoningAdapter, ReasoningRequest};
use super::report::{next_steps_for, DecisionReport, FailureReportView};
use super::scoring::{ConfidenceScorer, ScoreBands};
use super::validation::{InputValidator, ValidationError};
use crate::config::ReasoningConfig;

/// Linear lifecycle of a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Received,
    Validated,
    Ruled,
    Scored,
    Explained,
    Reported,
    Failed,
}

impl PipelineStage {
    pub const fn label(self) -> &'static str {
        match self {
            PipelineStage::Received => "RECEIVED",
            PipelineStage::Validated => "VALIDATED",
            PipelineStage::Ruled => "RULED",
            PipelineStage::Scored => "SCORED",
            PipelineStage::Explained => "EXPLAINED",
            PipelineStage::Reported => "REPORTED",
            PipelineStage::Failed => "FAILED",
        }
    }

    /// Successor on the happy path. `Reported` and `Failed` are terminal.
    pub const fn next(self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Received => Some(PipelineStage::Validated),
            PipelineStage::Validated => Some(PipelineStage::Ruled),
            PipelineStage::Ruled => Some(PipelineStage::Scored),
            PipelineStage::Scored => Some(PipelineStage::Explained),
            PipelineStage::Explained => Some(PipelineStage::Reported),
            PipelineStage::Reported | PipelineStage::Failed => None,
        }
    }

    /// Stages from which an evaluation may fail.
    pub const fn can_fail(self) -> bool {
        matches!(self, PipelineStage::Received | PipelineStage::Validated)
    }
}

/// Per-call switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// When false the reasoning adapter never calls the remote service (rule-only mode).
    pub use_remote_reasoning: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            use_remote_reasoning: true,
        }
    }
}

impl EvaluationOptions {
    pub fn rule_only() -> Self {
        Self {
            use_remote_reasoning: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("evaluation failed at {stage:?}: {detail}")]
    Internal { stage: PipelineStage, detail: String },
}

impl PipelineError {
    /// Stage the evaluation was in when it failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Validation(_) => PipelineStage::Received,
            PipelineError::Internal { stage, .. } => *stage,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Internal { .. } => "internal",
        }
    }

    /// Message safe to return to callers. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            PipelineError::Validation(error) => error.to_string(),
            PipelineError::Internal { .. } => {
                "the purchase could not be evaluated due to an internal error".to_string()
            }
        }
    }

    pub fn failure_view(&self) -> FailureReportView {
        FailureReportView {
            status: "error",
            error: self.public_message(),
            error_kind: self.kind(),
            field: match self {
                PipelineError::Validation(error) => Some(error.field().to_string()),
                PipelineError::Internal { .. } => None,
            },
        }
    }
}

impl From<ArithmeticError> for PipelineError {
    fn from(error: ArithmeticError) -> Self {
        PipelineError::Internal {
            stage: PipelineStage::Validated,
            detail: error.to_string(),
        }
    }
}

/// Sequences validation, rules, scoring and reasoning into one report.
///
/// Holds only read-only configuration, so a single instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct DecisionOrchestrator {
    validator: InputValidator,
    rules: RuleEvaluator,
    scorer: ConfidenceScorer,
    reasoning: ReasoningAdapter,
}

impl DecisionOrchestrator {
    pub fn new(
        validator: InputValidator,
        rules: RuleEvaluator,
        scorer: ConfidenceScorer,
        reasoning: ReasoningAdapter,
    ) -> Self {
        Self {
            validator,
            rules,
            scorer,
            reasoning,
        }
    }

    /// Default thresholds with the given reasoning adapter.
    pub fn with_reasoning(reasoning: ReasoningAdapter) -> Self {
        Self::new(
            InputValidator::default(),
            RuleEvaluator::new(RiskThresholds::default()),
            ConfidenceScorer::new(ScoreBands::default()),
            reasoning,
        )
    }

    /// Orchestrator that never leaves the process.
    pub fn rule_only() -> Self {
        Self::with_reasoning(ReasoningAdapter::fallback_only())
    }

    pub fn from_config(config: &ReasoningConfig) -> Result<Self, ExternalServiceError> {
        Ok(Self::with_reasoning(ReasoningAdapter::from_config(config)?))
    }

    pub fn reasoning(&self) -> &ReasoningAdapter {
        &self.reasoning
    }

    pub async fn evaluate(
        &self,
        raw: &RawPurchaseRequest,
        options: EvaluationOptions,
    ) -> Result<DecisionReport, PipelineError> {
        let mut stage = PipelineStage::Received;

        let request = self.validator.validate(raw).map_err(|error| {
            warn!(field = error.field(), error = %error, "purchase request rejected");
            PipelineError::from(error)
        })?;
        stage = advance(stage);

        let outcome = self.rules.evaluate(&request).map_err(|error| {
            warn!(stage = stage.label(), error = %error, "rule evaluation failed");
            PipelineError::from(error)
        })?;
        stage = advance(stage);

        let score = self.scorer.score(&outcome.facts);
        stage = advance(stage);

        let input = ReasoningRequest {
            request: &request,
            facts: &outcome.facts,
            risk: outcome.risk,
            score: &score,
        };
        let explanation = self
            .reasoning
            .explain(&input, options.use_remote_reasoning)
            .await;
        stage = advance(stage);

        let report = DecisionReport {
            hard_stop_detail: outcome.hard_stop_detail(),
            next_steps: next_steps_for(outcome.risk),
            risk: outcome.risk,
            facts: outcome.facts,
            request,
            score,
            explanation,
            generated_at: Utc::now(),
        };
        advance(stage);

        info!(
            risk = report.risk.code(),
            score_band = report.score.band.code(),
            reasoning = report.explanation.mode.label(),
            "purchase evaluated"
        );

        Ok(report)
    }
}

fn advance(stage: PipelineStage) -> PipelineStage {
    let next = stage.next().unwrap_or(stage);
    debug!(from = stage.label(), to = next.label(), "pipeline stage");
    next
}
