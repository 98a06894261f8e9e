//! Purchase risk evaluation.
//!
//! A request flows through [`pipeline::InputValidator`], [`pipeline::RuleEvaluator`],
//! [`pipeline::ConfidenceScorer`] and [`pipeline::ReasoningAdapter`]; the
//! [`pipeline::DecisionOrchestrator`] sequences them and assembles the final
//! [`pipeline::DecisionReport`]. Reports describe risk and alternatives only and never
//! constitute financial advice.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;
