use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::pipeline::domain::{PurchaseRequest, RawPurchaseItem, RawPurchaseRequest};
use crate::pipeline::reasoning::{
    ExternalServiceError, ReasoningAdapter, ReasoningRequest, ReasoningResult, ReasoningService,
};
use crate::pipeline::validation::InputValidator;
use crate::pipeline::DecisionOrchestrator;

pub(super) const STUB_TIMEOUT: Duration = Duration::from_millis(50);

pub(super) fn raw_request(income: f64, expenses: f64, savings: f64, cost: f64) -> RawPurchaseRequest {
    RawPurchaseRequest::from_parts(
        income,
        expenses,
        savings,
        [RawPurchaseItem::new("Laptop", cost)],
    )
}

pub(super) fn raw_json(value: Value) -> RawPurchaseRequest {
    serde_json::from_value(value).expect("raw request deserializes")
}

pub(super) fn validated(income: &str, expenses: &str, savings: &str, cost: &str) -> PurchaseRequest {
    let raw = raw_json(json!({
        "monthly_income": income,
        "fixed_expenses": expenses,
        "savings_goal": savings,
        "items": [{ "name": "Laptop", "cost": cost }],
    }));
    InputValidator::default()
        .validate(&raw)
        .expect("fixture request is valid")
}

pub(super) fn decimal(text: &str) -> Decimal {
    text.parse().expect("valid decimal")
}

/// Remote stand-in that always fails at the transport level.
#[derive(Debug, Default)]
pub(super) struct UnreachableService {
    pub(super) calls: AtomicUsize,
}

#[async_trait]
impl ReasoningService for UnreachableService {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn generate(
        &self,
        _input: &ReasoningRequest<'_>,
    ) -> Result<ReasoningResult, ExternalServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ExternalServiceError::Unavailable(
            "connection refused".to_string(),
        ))
    }
}

/// Remote stand-in that never answers within the adapter timeout.
#[derive(Debug)]
pub(super) struct SlowService;

#[async_trait]
impl ReasoningService for SlowService {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn generate(
        &self,
        input: &ReasoningRequest<'_>,
    ) -> Result<ReasoningResult, ExternalServiceError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        ScriptedService::healthy().reply(input)
    }
}

/// Remote stand-in returning a fixed reply.
#[derive(Debug)]
pub(super) struct ScriptedService {
    result: ReasoningResult,
    pub(super) calls: AtomicUsize,
}

impl ScriptedService {
    pub(super) fn new(result: ReasoningResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn healthy() -> Self {
        Self::new(ReasoningResult {
            decision: "MEDIUM".to_string(),
            confidence_score: 0.4,
            explanation: "Remote explanation of the purchase.".to_string(),
            alternatives: vec!["Remote alternative".to_string()],
        })
    }

    /// Reply that parses but fails structural validation.
    pub(super) fn malformed() -> Self {
        Self::new(ReasoningResult {
            decision: String::new(),
            confidence_score: 7.0,
            explanation: String::new(),
            alternatives: Vec::new(),
        })
    }

    fn reply(&self, _input: &ReasoningRequest<'_>) -> Result<ReasoningResult, ExternalServiceError> {
        Ok(self.result.clone())
    }
}

#[async_trait]
impl ReasoningService for ScriptedService {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(
        &self,
        input: &ReasoningRequest<'_>,
    ) -> Result<ReasoningResult, ExternalServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply(input)
    }
}

pub(super) fn adapter_with(service: Arc<dyn ReasoningService>) -> ReasoningAdapter {
    ReasoningAdapter::new(Some(service), STUB_TIMEOUT)
}

pub(super) fn orchestrator_with(service: Arc<dyn ReasoningService>) -> DecisionOrchestrator {
    DecisionOrchestrator::with_reasoning(adapter_with(service))
}

pub(super) async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("body is json");
    (status, value)
}
