//! OpenAI-compatible chat completion client.
//!
//! Works with any endpoint that implements `POST {base_url}/chat/completions`
//! with bearer authentication, including Cloud.ru Foundation Models.

use crate::llm::base::{ChatMessage, ChatModel, LlmError};
use crate::config::ConfigResult;
use crate::tools::http::client_for;
use async_trait::async_trait;
use fx_protocol::config_models::LlmConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(10);
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Exponential backoff before retry `attempt` (0-based), capped at
/// [`RETRY_MAX_DELAY`].
fn retry_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY
        .saturating_mul(1u32 << attempt.min(16))
        .min(RETRY_MAX_DELAY)
}

pub struct OpenAiCompatibleModel {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    presence_penalty: f32,
    max_retries: u32,
}

impl OpenAiCompatibleModel {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> ConfigResult<Self> {
        let client = client_for("language model client", config.timeout_secs)?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            presence_penalty: config.presence_penalty,
            max_retries: config.max_retries,
        })
    }

    /// Use a different model name with the same endpoint and parameters.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            presence_penalty: self.presence_penalty,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LlmError::Auth(format!("status {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatibleModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let mut attempt = 0;
        loop {
            debug!(model = %self.model, attempt, "requesting chat completion");
            match self.send_once(messages).await {
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let delay = retry_delay(attempt);
                    warn!(error = %err, ?delay, "chat completion failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
