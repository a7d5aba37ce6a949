//! Local HTTP stub for the rate endpoint, the search API, the geocoder and
//! the chat API.
//!
//! Binds `127.0.0.1:0`, so tests never touch the network and can run in
//! parallel. Responses are configurable per test; requests are recorded.

use super::fixtures::{
    cbr_body, chat_body, geocode_body, organic_body, TEST_GEOCODE_KEY, TEST_SEARCH_KEY,
};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct StubState {
    rate: Mutex<Option<(StatusCode, String)>>,
    search: Mutex<Option<(StatusCode, Value)>>,
    geocode: Mutex<Option<(StatusCode, String)>>,
    chat: Mutex<VecDeque<(StatusCode, Value)>>,
    pub search_requests: Mutex<Vec<Value>>,
    pub geocode_requests: Mutex<Vec<HashMap<String, String>>>,
    pub chat_requests: Mutex<Vec<Value>>,
    pub chat_auth: Mutex<Vec<Option<String>>>,
}

pub struct StubServer {
    pub base_url: String,
    pub state: Arc<StubState>,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl StubServer {
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .route("/daily_json.js", get(rate_handler))
            .route("/search", post(search_handler))
            .route("/geocode", get(geocode_handler))
            .route("/v1/chat/completions", post(chat_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Failed to read stub address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn rate_url(&self) -> String {
        format!("{}/daily_json.js", self.base_url)
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    pub fn geocode_url(&self) -> String {
        format!("{}/geocode", self.base_url)
    }

    pub fn llm_base_url(&self) -> String {
        format!("{}/v1", self.base_url)
    }

    pub fn set_rate(&self, status: u16, body: impl Into<String>) {
        *self.state.rate.lock().unwrap() = Some((status_code(status), body.into()));
    }

    pub fn set_search(&self, status: u16, body: Value) {
        *self.state.search.lock().unwrap() = Some((status_code(status), body));
    }

    pub fn set_geocode(&self, status: u16, body: impl Into<String>) {
        *self.state.geocode.lock().unwrap() = Some((status_code(status), body.into()));
    }

    pub fn geocode_calls(&self) -> usize {
        self.state.geocode_requests.lock().unwrap().len()
    }

    /// Queue one chat response; an empty queue answers with a default reply.
    pub fn push_chat(&self, status: u16, body: Value) {
        self.state
            .chat
            .lock()
            .unwrap()
            .push_back((status_code(status), body));
    }

    pub fn search_calls(&self) -> usize {
        self.state.search_requests.lock().unwrap().len()
    }

    pub fn chat_calls(&self) -> usize {
        self.state.chat_requests.lock().unwrap().len()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A URL on which nothing is listening.
#[allow(dead_code)]
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);
    format!("http://{addr}/daily_json.js")
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("valid status code")
}

async fn rate_handler(State(state): State<Arc<StubState>>) -> (StatusCode, String) {
    state
        .rate
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| (StatusCode::OK, cbr_body()))
}

async fn search_handler(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.search_requests.lock().unwrap().push(body);

    let key = headers.get("X-API-KEY").and_then(|v| v.to_str().ok());
    if key != Some(TEST_SEARCH_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "message": "Unauthorized." })),
        );
    }

    let (status, body) = state
        .search
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| (StatusCode::OK, organic_body(7)));
    (status, Json(body))
}

async fn geocode_handler(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let authorized = params.get("apiKey").map(String::as_str) == Some(TEST_GEOCODE_KEY);
    state.geocode_requests.lock().unwrap().push(params);

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            r#"{"statusCode":401,"error":"Unauthorized"}"#.to_string(),
        );
    }
    state
        .geocode
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| (StatusCode::OK, geocode_body()))
}

async fn chat_handler(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.chat_requests.lock().unwrap().push(body);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.chat_auth.lock().unwrap().push(auth);

    let (status, body) = state
        .chat
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| (StatusCode::OK, chat_body("Меняйте в ВТБ.")));
    (status, Json(body))
}
