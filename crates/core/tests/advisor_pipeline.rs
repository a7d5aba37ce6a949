//! End-to-end tests for the advisor pipeline.
//!
//! Every upstream service is the local stub, so these runs exercise the
//! real tools, the real chat client and configuration loading together.

mod common;

use common::*;
use fx_core::agents::RoleRegistry;
use fx_core::config::{load_config, Secrets};
use fx_core::engine::{AdvisorEngine, AdvisorTools, EngineOptions, FailureKind};
use fx_core::tools::{BankRateTool, OfficialRateTool, PlaceSearchTool, UserPromptTool};
use fx_protocol::ipc::Event;
use fx_protocol::query_models::UserQuery;
use fx_protocol::run_models::{RunStatus, StageKind};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tokio::sync::mpsc;

async fn collect_events(mut rx: mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn secrets(search_key: &str) -> Secrets {
    Secrets::new(Some("llm-key".to_string()), Some(search_key.to_string()))
}

async fn engine_for(
    server: &StubServer,
    secrets: &Secrets,
    options: &EngineOptions,
) -> (AdvisorEngine, tempfile::TempDir) {
    let project = create_test_project(&server.base_url).unwrap();
    let config = load_config(project.path()).await.unwrap();
    let engine = AdvisorEngine::from_config(&config, secrets, options).unwrap();
    (engine, project)
}

#[tokio::test]
async fn test_full_run_from_project_config() {
    let server = StubServer::start().await;
    let options = EngineOptions {
        role: Some("tester".to_string()),
        no_llm: false,
    };
    let (engine, _project) = engine_for(&server, &secrets(TEST_SEARCH_KEY), &options).await;
    let (tx, rx) = mpsc::channel(100);

    let (run, report) = engine
        .run(Some(UserQuery::new("Москва, Тверская 1")), tx)
        .await
        .unwrap();
    let events = collect_events(rx).await;

    assert_eq!(run.status, RunStatus::Completed);
    assert_event_sequence(&events);
    assert!(has_run_completed(&events));
    assert!(stage_results(&events).iter().all(|(_, ok)| *ok));

    // max_results = 3 in the project config.
    assert_eq!(report.places.value().map(Vec::len), Some(3));
    let found: Vec<&str> = report.found_quotes().map(|q| q.bank_name()).collect();
    assert_eq!(found, vec!["ВТБ", "Сбербанк", "Альфа-Банк"]);
    assert_eq!(report.recommendation_text(), Some("Меняйте в ВТБ."));
    assert!(!report.render_plain().contains("Data source issues"));

    let search = server.state.search_requests.lock().unwrap();
    assert_eq!(search[0]["q"], "банки в радиусе 5 км от Москва, Тверская 1");

    let chat = server.state.chat_requests.lock().unwrap();
    assert_eq!(chat[0]["model"], "role-model");
    assert_eq!(chat[0]["messages"][0]["content"], "You are a test advisor.");
    let context = chat[0]["messages"][1]["content"].as_str().unwrap();
    assert!(context.contains("Official rate: USD/RUB 92.5000 as of 2024-01-15"));
}

#[tokio::test]
async fn test_rejected_search_key_degrades_run() {
    let server = StubServer::start().await;
    let (engine, _project) =
        engine_for(&server, &secrets("wrong-key"), &EngineOptions::default()).await;
    let (tx, rx) = mpsc::channel(100);

    let (run, report) = engine
        .run(Some(UserQuery::new("Moscow")), tx)
        .await
        .unwrap();
    let events = collect_events(rx).await;

    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(
        report.places.failure().map(|f| f.kind),
        Some(FailureKind::Auth)
    );
    assert!(report.bank_quotes.failure().is_some_and(|f| f.is_skipped()));
    assert_eq!(
        stage_results(&events),
        vec![
            (StageKind::UserAddress, true),
            (StageKind::OfficialRate, true),
            (StageKind::PlaceSearch, false),
            (StageKind::BankRates, false),
            (StageKind::Recommendation, true),
        ]
    );

    let chat = server.state.chat_requests.lock().unwrap();
    let context = chat[0]["messages"][1]["content"].as_str().unwrap();
    assert!(context.contains("Banks near the address: unknown [SOURCE FAILED: place search:"));

    let plain = report.render_plain();
    assert!(plain.contains("Data source issues:"));
    assert!(plain.contains("- bank rates: skipped (no places to look up)"));
}

#[tokio::test]
async fn test_no_data_fails_run() {
    let server = StubServer::start().await;
    server.set_rate(503, "down");
    server.set_search(200, empty_search_body());
    let (engine, _project) =
        engine_for(&server, &secrets(TEST_SEARCH_KEY), &EngineOptions::default()).await;
    let (tx, rx) = mpsc::channel(100);

    let result = engine.run(Some(UserQuery::new("Moscow")), tx).await;
    let events = collect_events(rx).await;

    let message = result.unwrap_err().to_string();
    assert!(message.contains("official rate"));
    assert!(message.contains("no results for query 'банки в радиусе 5 км от Moscow'"));
    assert_event_sequence(&events);
    assert!(matches!(events.last(), Some(Event::RunError { .. })));
    assert_eq!(server.chat_calls(), 0);
}

#[tokio::test]
async fn test_model_failure_keeps_report() {
    let server = StubServer::start().await;
    server.push_chat(401, json!({ "error": "invalid key" }));
    let (engine, _project) =
        engine_for(&server, &secrets(TEST_SEARCH_KEY), &EngineOptions::default()).await;
    let (tx, _rx) = mpsc::channel(100);

    let (run, report) = engine
        .run(Some(UserQuery::new("Moscow")), tx)
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    let plain = report.render_plain();
    assert!(plain.contains("Recommendation: unknown [SOURCE FAILED: recommendation:"));
    assert!(plain.contains("Bank quotes (demo data"));
}

#[tokio::test]
async fn test_no_llm_skips_model() {
    let server = StubServer::start().await;
    let options = EngineOptions {
        role: None,
        no_llm: true,
    };
    let secrets = Secrets::new(None, Some(TEST_SEARCH_KEY.to_string()));
    let (engine, _project) = engine_for(&server, &secrets, &options).await;
    let (tx, _rx) = mpsc::channel(100);

    let (_, report) = engine
        .run(Some(UserQuery::new("Moscow")), tx)
        .await
        .unwrap();

    assert!(report.recommendation.is_none());
    assert_eq!(server.chat_calls(), 0);
}

#[tokio::test]
async fn test_interactive_address() {
    let server = StubServer::start().await;
    let tools = AdvisorTools {
        address: Arc::new(UserPromptTool::with_io(
            "Введите ваш адрес",
            Box::new(Cursor::new(b"Moscow\n".to_vec())),
            Box::new(std::io::sink()),
        )),
        official_rate: Arc::new(OfficialRateTool::new(&rate_config(server.rate_url())).unwrap()),
        place_search: Arc::new(
            PlaceSearchTool::new(
                &search_config(server.search_url()),
                Some(TEST_SEARCH_KEY.to_string()),
            )
            .unwrap(),
        ),
        bank_rates: BankRateTool::builtin(),
    };
    let engine = AdvisorEngine::new(tools, RoleRegistry::builtin_advisor());
    let (tx, _rx) = mpsc::channel(100);

    let (_, report) = engine.run(None, tx).await.unwrap();

    assert_eq!(report.address.value().map(String::as_str), Some("Moscow"));
    let search = server.state.search_requests.lock().unwrap();
    assert_eq!(search[0]["q"], "банки в радиусе 5 км от Moscow");
}

#[tokio::test]
async fn test_geocoder_biases_search_location() {
    let server = StubServer::start().await;
    let secrets = secrets(TEST_SEARCH_KEY).with_geocode_key(Some(TEST_GEOCODE_KEY.to_string()));
    let (engine, _project) = engine_for(&server, &secrets, &EngineOptions::default()).await;
    let (tx, rx) = mpsc::channel(100);

    let (_, report) = engine
        .run(Some(UserQuery::new("Тверская 1")), tx)
        .await
        .unwrap();
    let events = collect_events(rx).await;

    assert_event_sequence(&events);
    assert_eq!(stage_results(&events)[1], (StageKind::Geocode, true));
    assert_eq!(server.geocode_calls(), 1);

    let search = server.state.search_requests.lock().unwrap();
    assert_eq!(search[0]["location"], "Москва, Россия");

    let chat = server.state.chat_requests.lock().unwrap();
    let context = chat[0]["messages"][1]["content"].as_str().unwrap();
    assert!(context.contains("Location: 55.757600, 37.613600 (Тверская улица, 1, Москва, Россия)"));
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_rejected_geocoder_key_degrades_run() {
    let server = StubServer::start().await;
    let secrets = secrets(TEST_SEARCH_KEY).with_geocode_key(Some("wrong-key".to_string()));
    let (engine, _project) = engine_for(&server, &secrets, &EngineOptions::default()).await;
    let (tx, _rx) = mpsc::channel(100);

    let (run, report) = engine
        .run(Some(UserQuery::new("Moscow")), tx)
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    let failure = report.location.as_ref().and_then(|l| l.failure()).unwrap();
    assert_eq!(failure.kind, FailureKind::Auth);

    let search = server.state.search_requests.lock().unwrap();
    assert!(search[0].get("location").is_none());
    assert!(report.render_plain().contains("- geocode: authentication failed"));
}
