//! Place search tool backed by the Serper.dev Google Search API.
//!
//! The tool sends a free-text query, keeps the API's ranking order, and
//! pulls a place name and an address candidate out of each result with
//! text heuristics. The heuristics are best-effort: nothing guarantees
//! that the extracted address is a real address, and any radius in the
//! query is only text for the search engine.

use crate::tools::base::{Tool, ToolError};
use crate::config::ConfigResult;
use crate::tools::http::{client_for, network_error};
use async_trait::async_trait;
use fx_protocol::config_models::SearchConfig;
use fx_protocol::place_models::PlaceResult;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

const TITLE_SEPARATORS: [&str; 4] = [" - ", " | ", " — ", " – "];
const CLAUSE_SEPARATORS: [char; 5] = ['·', '|', ';', '\n', '…'];
const ADDRESS_LABELS: [&str; 2] = ["адрес:", "address:"];
const STREET_MARKERS: [&str; 16] = [
    "ул.", "улица", "пр-т", "проспект", "пер.", "переулок", "шоссе", "бульвар", "б-р", "наб.",
    "пл.", "площадь", "street", "st.", "ave", "road",
];

/// A search query plus an optional location bias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub location: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    q: &'a str,
    num: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gl: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hl: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
    #[serde(default)]
    places: Vec<SearchHit>,
}

/// One entry of `organic` or `places`. All fields are optional upstream.
#[derive(Debug, Default, Deserialize)]
struct SearchHit {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    address: Option<String>,
}

/// Searches for places and extracts ranked candidates.
///
/// After the API rejects the key once, every later call fails with
/// [`ToolError::Auth`] without sending a request.
pub struct PlaceSearchTool {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    results_requested: u32,
    max_results: usize,
    default_location: Option<String>,
    gl: Option<String>,
    hl: Option<String>,
    auth_rejected: AtomicBool,
}

impl PlaceSearchTool {
    pub fn new(config: &SearchConfig, api_key: Option<String>) -> ConfigResult<Self> {
        let client = client_for("search client", config.timeout_secs)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            results_requested: config.results_requested.max(1),
            max_results: config.max_results,
            default_location: config.location.clone(),
            gl: config.gl.clone(),
            hl: config.hl.clone(),
            auth_rejected: AtomicBool::new(false),
        })
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<PlaceResult>, ToolError> {
        if self.auth_rejected.load(Ordering::Relaxed) {
            return Err(ToolError::Auth(
                "search API key was rejected earlier in this session".to_string(),
            ));
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ToolError::Auth("search API key is not configured".to_string()))?;

        let body = SearchBody {
            q: &request.query,
            num: self.results_requested,
            location: request
                .location
                .as_deref()
                .or(self.default_location.as_deref()),
            gl: self.gl.as_deref(),
            hl: self.hl.as_deref(),
        };
        debug!(endpoint = %self.endpoint, query = %request.query, "searching places");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error("search API", &e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(%status, "search API rejected the key");
            self.auth_rejected.store(true, Ordering::Relaxed);
            return Err(ToolError::Auth(format!(
                "search API rejected the key (status {status})"
            )));
        }
        if !status.is_success() {
            return Err(ToolError::Network(format!(
                "search API returned status {status}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| network_error("search API", &e))?;
        let parsed: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| ToolError::Parse(format!("search response is not a JSON object: {e}")))?;

        let places = extract_places(parsed, self.max_results);
        if places.is_empty() {
            return Err(ToolError::EmptyResult(request.query.clone()));
        }
        info!(count = places.len(), "places extracted");
        Ok(places)
    }
}

#[async_trait]
impl Tool for PlaceSearchTool {
    type Input = SearchRequest;
    type Output = Vec<PlaceResult>;

    fn name(&self) -> &'static str {
        "place_search"
    }

    async fn call(&self, input: SearchRequest) -> Result<Vec<PlaceResult>, ToolError> {
        self.search(&input).await
    }
}

/// Usable `organic` hits, or usable `places` hits when `organic` has none.
fn extract_places(response: SearchResponse, max_results: usize) -> Vec<PlaceResult> {
    let usable = |hits: Vec<SearchHit>| -> Vec<PlaceResult> {
        hits.into_iter()
            .filter_map(place_from_hit)
            .take(max_results)
            .collect()
    };

    let organic = usable(response.organic);
    if organic.is_empty() {
        usable(response.places)
    } else {
        organic
    }
}

fn place_from_hit(hit: SearchHit) -> Option<PlaceResult> {
    let title = hit.title.unwrap_or_default();
    let snippet = hit.snippet.unwrap_or_default();
    if title.trim().is_empty() && snippet.trim().is_empty() {
        return None;
    }

    let name = match place_name(&title) {
        Some(name) => name,
        None => snippet.trim().chars().take(60).collect(),
    };
    let address = hit
        .address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .or_else(|| address_from_snippet(&snippet))
        .unwrap_or_else(|| snippet.trim().to_string());

    Some(PlaceResult {
        name,
        address,
        raw_snippet: snippet,
        link: hit.link.filter(|l| !l.is_empty()),
    })
}

/// The title up to its first separator, e.g. `"Сбербанк - Отделения"`
/// becomes `"Сбербанк"`.
pub fn place_name(title: &str) -> Option<String> {
    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.find(sep))
        .min()
        .unwrap_or(title.len());
    let name = title[..cut].trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// The first snippet clause that looks like an address.
pub fn address_from_snippet(snippet: &str) -> Option<String> {
    for clause in snippet.split(&CLAUSE_SEPARATORS[..]) {
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }
        let lower = clause.to_lowercase();

        if let Some(rest) = ADDRESS_LABELS
            .iter()
            .find_map(|label| lower.find(label).map(|pos| (pos, label.len())))
            .and_then(|(pos, len)| label_tail(clause, &lower, pos + len))
        {
            return Some(rest);
        }

        if STREET_MARKERS.iter().any(|marker| lower.contains(marker)) {
            return Some(clause.trim_end_matches('.').trim().to_string());
        }
    }
    None
}

/// Text following a label found at byte offset `end` of the lowercased
/// clause. Lowercasing can change byte lengths, so the offset is mapped
/// back through character counts.
fn label_tail(clause: &str, lower: &str, end: usize) -> Option<String> {
    let chars_before = lower.get(..end)?.chars().count();
    let tail: String = clause.chars().skip(chars_before).collect();
    let tail = tail.trim().trim_end_matches('.').trim();
    (!tail.is_empty()).then(|| tail.to_string())
}
