//! Mock chat model for tests and offline runs.

use crate::llm::base::{ChatMessage, ChatModel, LlmError};
use async_trait::async_trait;
use std::sync::Mutex;

/// A model that answers with a canned reply (or a canned error) and
/// remembers the last request.
pub struct MockModel {
    reply: Result<String, LlmError>,
    last_request: Mutex<Vec<ChatMessage>>,
}

impl MockModel {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            last_request: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: LlmError) -> Self {
        Self {
            reply: Err(error),
            last_request: Mutex::new(Vec::new()),
        }
    }

    /// Messages of the most recent `complete` call.
    pub fn last_request(&self) -> Vec<ChatMessage> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = messages.to_vec();
        }
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_model_reply() {
        let model = MockModel::replying("Go to ВТБ");
        let reply = model
            .complete(&[ChatMessage::user("where?")])
            .await
            .unwrap();
        assert_eq!(reply, "Go to ВТБ");
        assert_eq!(model.last_request(), vec![ChatMessage::user("where?")]);
    }

    #[tokio::test]
    async fn test_mock_model_failure() {
        let model = MockModel::failing(LlmError::EmptyResponse);
        let result = model.complete(&[]).await;
        assert_eq!(result, Err(LlmError::EmptyResponse));
    }
}
