//! Integration tests for the OpenAI-compatible chat client.

mod common;

use common::*;
use fx_core::llm::{ChatMessage, ChatModel, LlmError, OpenAiCompatibleModel};
use serde_json::json;

fn model(server: &StubServer) -> OpenAiCompatibleModel {
    OpenAiCompatibleModel::new(&llm_config(server.llm_base_url()), "llm-key").unwrap()
}

fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are an advisor."),
        ChatMessage::user("Official rate: USD/RUB 92.5000"),
    ]
}

#[tokio::test]
async fn test_completion_round_trip() {
    let server = StubServer::start().await;
    server.push_chat(200, chat_body("  Меняйте в ВТБ.\n"));

    let reply = model(&server).complete(&messages()).await.unwrap();

    assert_eq!(reply, "Меняйте в ВТБ.");
    let requests = server.state.chat_requests.lock().unwrap();
    assert_eq!(requests[0]["model"], "zai-org/GLM-4.5");
    assert_eq!(requests[0]["messages"][1]["role"], "user");
    assert_eq!(requests[0]["max_tokens"], 5000);
    assert_eq!(
        server.state.chat_auth.lock().unwrap()[0].as_deref(),
        Some("Bearer llm-key")
    );
}

#[tokio::test]
async fn test_transient_status_is_retried() {
    let server = StubServer::start().await;
    server.push_chat(503, json!({ "error": "overloaded" }));
    server.push_chat(200, chat_body("ok"));

    let reply = model(&server).complete(&messages()).await.unwrap();

    assert_eq!(reply, "ok");
    assert_eq!(server.chat_calls(), 2);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = StubServer::start().await;
    for _ in 0..3 {
        server.push_chat(429, json!({ "error": "rate limited" }));
    }

    let err = model(&server).complete(&messages()).await.unwrap_err();

    assert!(matches!(err, LlmError::Status { status: 429, .. }));
    // One attempt plus `max_retries = 1`.
    assert_eq!(server.chat_calls(), 2);
}

#[tokio::test]
async fn test_rejected_key_is_not_retried() {
    let server = StubServer::start().await;
    server.push_chat(401, json!({ "error": "invalid key" }));

    let err = model(&server).complete(&messages()).await.unwrap_err();

    assert!(matches!(err, LlmError::Auth(_)));
    assert_eq!(server.chat_calls(), 1);
}

#[tokio::test]
async fn test_empty_choices() {
    let server = StubServer::start().await;
    server.push_chat(200, json!({ "choices": [] }));

    let err = model(&server).complete(&messages()).await.unwrap_err();
    assert_eq!(err, LlmError::EmptyResponse);
}

#[tokio::test]
async fn test_malformed_body_is_parse() {
    let server = StubServer::start().await;
    server.push_chat(200, json!({ "choices": "not a list" }));

    let err = model(&server).complete(&messages()).await.unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)));
}
