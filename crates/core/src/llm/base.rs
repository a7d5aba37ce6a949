//! Base ChatModel trait and supporting types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a chat completion request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("model API key rejected: {0}")]
    Auth(String),
    #[error("model request failed: {0}")]
    Network(String),
    #[error("model API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed model response: {0}")]
    Parse(String),
    #[error("model returned no content")]
    EmptyResponse,
}

impl LlmError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier used in logs and reports.
    fn name(&self) -> &str;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}
