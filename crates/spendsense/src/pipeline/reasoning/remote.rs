use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt::{build_user_prompt, SYSTEM_PROMPT};
use super::{ExternalServiceError, ReasoningRequest, ReasoningResult, ReasoningService};
use crate::config::ReasoningConfig;

const API_VERSION: &str = "2023-06-01";

/// HTTP client for a Messages-style reasoning endpoint.
pub struct RemoteReasoningClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl RemoteReasoningClient {
    pub fn new(config: &ReasoningConfig) -> Result<Self, ExternalServiceError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ExternalServiceError::Unavailable("no credential configured".into()))?;

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

impl fmt::Debug for RemoteReasoningClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteReasoningClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReasoningService for RemoteReasoningClient {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn generate(
        &self,
        input: &ReasoningRequest<'_>,
    ) -> Result<ReasoningResult, ExternalServiceError> {
        let prompt = build_user_prompt(input);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "requesting remote explanation");
        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExternalServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: MessagesResponse = resp
            .json()
            .await
            .map_err(|err| ExternalServiceError::Malformed(err.to_string()))?;

        let text = payload
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| ExternalServiceError::Malformed("no text block in reply".into()))?;

        parse_structured_reply(&text)
    }
}

/// Extract and validate the JSON object carried in a reply. Code fences and surrounding
/// prose are tolerated; anything without a well-formed object with the required fields is
/// rejected.
pub fn parse_structured_reply(text: &str) -> Result<ReasoningResult, ExternalServiceError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let candidate = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(ExternalServiceError::Malformed(
                "reply does not contain a JSON object".into(),
            ))
        }
    };

    let result: ReasoningResult = serde_json::from_str(candidate)
        .map_err(|err| ExternalServiceError::Malformed(err.to_string()))?;
    result.validate()?;
    Ok(result)
}
