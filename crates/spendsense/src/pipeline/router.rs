use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::domain::RawPurchaseRequest;
use super::orchestrator::{DecisionOrchestrator, EvaluationOptions, PipelineError};
use super::report::FailureReportView;

/// Query switches accepted by the evaluation endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateQuery {
    #[serde(default)]
    pub rule_only: bool,
}

/// Router exposing the purchase evaluation endpoint.
pub fn decision_router(orchestrator: Arc<DecisionOrchestrator>) -> Router {
    Router::new()
        .route("/api/v1/purchases/evaluate", post(evaluate_handler))
        .with_state(orchestrator)
}

pub(crate) async fn evaluate_handler(
    State(orchestrator): State<Arc<DecisionOrchestrator>>,
    Query(query): Query<EvaluateQuery>,
    payload: Result<axum::Json<Value>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(axum::Json(body)) => body,
        Err(rejection) => return rejected_body(rejection.status(), rejection.body_text()),
    };
    if !body.is_object() {
        return rejected_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            "request body must be a JSON object".to_string(),
        );
    }
    let raw: RawPurchaseRequest = match serde_json::from_value(body) {
        Ok(raw) => raw,
        Err(error) => {
            return rejected_body(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("request body is not a purchase request: {error}"),
            )
        }
    };

    let options = if query.rule_only {
        EvaluationOptions::rule_only()
    } else {
        EvaluationOptions::default()
    };

    match orchestrator.evaluate(&raw, options).await {
        Ok(report) => (StatusCode::OK, axum::Json(report.view())).into_response(),
        Err(error @ PipelineError::Validation(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(error.failure_view()),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(error.failure_view()),
        )
            .into_response(),
    }
}

fn rejected_body(status: StatusCode, error: String) -> Response {
    let view = FailureReportView {
        status: "error",
        error,
        error_kind: "validation",
        field: None,
    };
    (status, axum::Json(view)).into_response()
}
