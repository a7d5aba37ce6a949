//! Test fixtures: upstream response bodies, configs and project folders.

use fx_protocol::config_models::{GeocodeConfig, LlmConfig, OfficialRateConfig, SearchConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

/// API key the stub search endpoint accepts.
pub const TEST_SEARCH_KEY: &str = "test-search-key";

/// API key the stub geocoder accepts.
pub const TEST_GEOCODE_KEY: &str = "test-geocode-key";

/// The documented rate scenario: 92.5 on 2024-01-15.
#[allow(dead_code)]
pub fn cbr_body() -> String {
    json!({
        "Date": "2024-01-15T11:30:00+03:00",
        "PreviousDate": "2024-01-13T11:30:00+03:00",
        "Valute": {
            "USD": {
                "ID": "R01235",
                "CharCode": "USD",
                "Nominal": 1,
                "Name": "Доллар США",
                "Value": 92.5,
                "Previous": 91.9
            },
            "JPY": {
                "CharCode": "JPY",
                "Nominal": 100,
                "Value": 62.1
            }
        }
    })
    .to_string()
}

/// A search response with `count` organic bank results, in rank order.
#[allow(dead_code)]
pub fn organic_body(count: usize) -> Value {
    let banks = [
        ("ВТБ", "ул. Тверская, 7"),
        ("Сбербанк", "ул. Тверская, 18"),
        ("Альфа-Банк", "пр-т Мира, 12"),
        ("Газпромбанк", "Новинский бульвар, 31"),
        ("Т-Банк", "Ленинградское шоссе, 39"),
        ("Райффайзенбанк", "Смоленская пл., 3"),
        ("Кафе Пушкин", "Тверской бульвар, 26А"),
    ];
    let organic: Vec<Value> = banks
        .iter()
        .cycle()
        .take(count)
        .enumerate()
        .map(|(i, (name, street))| {
            json!({
                "title": format!("{name} - отделение {} | Москва", i + 1),
                "link": format!("https://example.com/{}", i + 1),
                "snippet": format!("Обмен валюты · {street} · Открыто до 20:00"),
                "position": i + 1
            })
        })
        .collect();
    json!({ "organic": organic })
}

/// A search response with no results at all.
#[allow(dead_code)]
pub fn empty_search_body() -> Value {
    json!({ "organic": [], "searchParameters": { "q": "банки в радиусе 5 км от Moscow" } })
}

/// A geocoder match for central Moscow.
#[allow(dead_code)]
pub fn geocode_body() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {
                "country": "Россия",
                "city": "Москва",
                "street": "Тверская улица",
                "housenumber": "1",
                "lon": 37.6136,
                "lat": 55.7576,
                "formatted": "Тверская улица, 1, Москва, Россия",
                "rank": { "confidence": 1 }
            },
            "geometry": { "type": "Point", "coordinates": [37.6136, 55.7576] }
        }]
    })
    .to_string()
}

/// A chat completion carrying `content`.
#[allow(dead_code)]
pub fn chat_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[allow(dead_code)]
pub fn rate_config(endpoint: String) -> OfficialRateConfig {
    OfficialRateConfig {
        endpoint,
        timeout_secs: 2,
        ..OfficialRateConfig::default()
    }
}

#[allow(dead_code)]
pub fn search_config(endpoint: String) -> SearchConfig {
    SearchConfig {
        endpoint,
        timeout_secs: 2,
        ..SearchConfig::default()
    }
}

#[allow(dead_code)]
pub fn geocode_config(endpoint: String) -> GeocodeConfig {
    GeocodeConfig {
        endpoint,
        timeout_secs: 2,
        ..GeocodeConfig::default()
    }
}

#[allow(dead_code)]
pub fn llm_config(base_url: String) -> LlmConfig {
    LlmConfig {
        base_url,
        timeout_secs: 2,
        max_retries: 1,
        ..LlmConfig::default()
    }
}

/// A project directory whose `config.toml` points every endpoint at `base`.
#[allow(dead_code)]
pub fn create_test_project(base: &str) -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let fx_dir = temp_dir.path().join(".fx-advisor");
    std::fs::create_dir_all(fx_dir.join("agents"))?;

    let config = format!(
        r#"[llm]
base_url = "{base}/v1"
model = "test-model"
timeout_secs = 2
max_retries = 0

[official_rate]
endpoint = "{base}/daily_json.js"
timeout_secs = 2

[search]
endpoint = "{base}/search"
max_results = 3
timeout_secs = 2

[geocode]
endpoint = "{base}/geocode"
timeout_secs = 2
"#
    );
    std::fs::write(fx_dir.join("config.toml"), config)?;

    let role = r#"---
name: tester
description: Test role
model: role-model
color: blue
---
You are a test advisor."#;
    std::fs::write(fx_dir.join("agents/tester.md"), role)?;

    Ok(temp_dir)
}
