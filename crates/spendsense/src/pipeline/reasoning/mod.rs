//! Natural-language explanation of a classified purchase.
//!
//! The remote reasoning service is modelled as the [`ReasoningService`] capability. The
//! [`ReasoningAdapter`] bounds every remote call with a timeout and substitutes the
//! deterministic [`FallbackReasoner`] whenever the call fails, times out, returns a payload
//! that fails structural validation, or no remote service is configured.

mod fallback;
mod prompt;
mod remote;

pub use fallback::FallbackReasoner;
pub use prompt::{build_user_prompt, SYSTEM_PROMPT};
pub use remote::{parse_structured_reply, RemoteReasoningClient};

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{
    ConfidenceScore, Explanation, FinancialFacts, PurchaseRequest, ReasoningMode, RiskLevel,
};
use crate::config::ReasoningConfig;

/// Appended to every remotely generated explanation.
pub const ADVICE_DISCLAIMER: &str = "This analysis is for informational purposes only and is not financial advice. \
Make your own decision based on your complete financial situation.";

/// Everything a reasoning service may see about one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ReasoningRequest<'a> {
    pub request: &'a PurchaseRequest,
    pub facts: &'a FinancialFacts,
    pub risk: RiskLevel,
    pub score: &'a ConfidenceScore,
}

/// Structured reply expected from a reasoning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningResult {
    pub decision: String,
    pub confidence_score: f64,
    pub explanation: String,
    pub alternatives: Vec<String>,
}

impl ReasoningResult {
    /// Structural checks beyond what deserialization already enforces.
    pub fn validate(&self) -> Result<(), ExternalServiceError> {
        if self.decision.trim().is_empty() {
            return Err(ExternalServiceError::Malformed(
                "decision is empty".to_string(),
            ));
        }
        if self.explanation.trim().is_empty() {
            return Err(ExternalServiceError::Malformed(
                "explanation is empty".to_string(),
            ));
        }
        if !self.confidence_score.is_finite() || !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(ExternalServiceError::Malformed(format!(
                "confidence_score {} outside [0, 1]",
                self.confidence_score
            )));
        }
        Ok(())
    }
}

/// Failure talking to a reasoning service. Always absorbed by the adapter.
#[derive(Debug, thiserror::Error)]
pub enum ExternalServiceError {
    #[error("reasoning service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("reasoning service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("reasoning service returned malformed payload: {0}")]
    Malformed(String),
    #[error("reasoning service timed out after {0:?}")]
    Timeout(Duration),
    #[error("reasoning service unavailable: {0}")]
    Unavailable(String),
}

/// Capability producing explanations for a classified purchase.
#[async_trait]
pub trait ReasoningService: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        input: &ReasoningRequest<'_>,
    ) -> Result<ReasoningResult, ExternalServiceError>;
}

/// Remote-first explanation source with a local fallback that never fails.
#[derive(Debug, Clone)]
pub struct ReasoningAdapter {
    remote: Option<Arc<dyn ReasoningService>>,
    fallback: FallbackReasoner,
    timeout: Duration,
}

impl ReasoningAdapter {
    pub fn new(remote: Option<Arc<dyn ReasoningService>>, timeout: Duration) -> Self {
        Self {
            remote,
            fallback: FallbackReasoner,
            timeout,
        }
    }

    /// Adapter that only ever uses the local templates.
    pub fn fallback_only() -> Self {
        Self::new(None, ReasoningConfig::default().timeout)
    }

    /// Build the adapter from configuration, wiring the HTTP client only when a credential
    /// is present and the remote call is enabled.
    pub fn from_config(config: &ReasoningConfig) -> Result<Self, ExternalServiceError> {
        let remote: Option<Arc<dyn ReasoningService>> = if config.remote_available() {
            Some(Arc::new(RemoteReasoningClient::new(config)?))
        } else {
            None
        };
        Ok(Self::new(remote, config.timeout))
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Produce an explanation. `allow_remote = false` forces rule-only mode.
    pub async fn explain(&self, input: &ReasoningRequest<'_>, allow_remote: bool) -> Explanation {
        if allow_remote {
            if let Some(remote) = &self.remote {
                match self.call_remote(remote.as_ref(), input).await {
                    Ok(result) => {
                        debug!(service = remote.name(), "remote explanation accepted");
                        return Explanation {
                            text: format!("{}\n\n---\n{}", result.explanation.trim(), ADVICE_DISCLAIMER),
                            alternatives: result.alternatives,
                            mode: ReasoningMode::Remote,
                        };
                    }
                    Err(err) => {
                        warn!(service = remote.name(), error = %err, "falling back to local explanation");
                    }
                }
            }
        }

        self.fallback.explain(input)
    }

    async fn call_remote(
        &self,
        remote: &dyn ReasoningService,
        input: &ReasoningRequest<'_>,
    ) -> Result<ReasoningResult, ExternalServiceError> {
        let result = tokio::time::timeout(self.timeout, remote.generate(input))
            .await
            .map_err(|_| ExternalServiceError::Timeout(self.timeout))??;
        result.validate()?;
        Ok(result)
    }
}
