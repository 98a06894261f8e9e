use metrics_exporter_prometheus::PrometheusHandle;
use spendsense::config::AppConfig;
use spendsense::error::AppError;
use spendsense::pipeline::{DecisionOrchestrator, RawPurchaseItem};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) const SERVICE_NAME: &str = "spendsense";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the orchestrator from loaded configuration.
pub(crate) fn build_orchestrator(config: &AppConfig) -> Result<DecisionOrchestrator, AppError> {
    let orchestrator = DecisionOrchestrator::from_config(&config.reasoning)?;
    info!(
        remote_reasoning = orchestrator.reasoning().has_remote(),
        timeout_ms = orchestrator.reasoning().timeout().as_millis() as u64,
        "decision pipeline configured"
    );
    Ok(orchestrator)
}

/// Parse a `NAME=COST` item flag. The cost is passed through as text for the validator.
pub(crate) fn parse_item(raw: &str) -> Result<RawPurchaseItem, String> {
    let (name, cost) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=COST, got '{raw}'"))?;

    Ok(RawPurchaseItem::new(name.trim(), cost.trim()))
}
