//! Official exchange rate tool.
//!
//! Fetches the daily rate document published by the Central Bank of
//! Russia mirror (`daily_json.js`) and extracts one currency's rate and
//! the publication date.

use crate::tools::base::{Tool, ToolError};
use crate::config::ConfigResult;
use crate::tools::http::{client_for, network_error};
use async_trait::async_trait;
use fx_protocol::config_models::OfficialRateConfig;
use fx_protocol::rate_models::ExchangeRate;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, info};

const RATE_CONTAINER_KEYS: [&str; 3] = ["Valute", "valute", "rates"];
const RATE_VALUE_KEYS: [&str; 4] = ["Value", "value", "Rate", "rate"];
const NOMINAL_KEYS: [&str; 2] = ["Nominal", "nominal"];
const DATE_KEYS: [&str; 2] = ["Date", "date"];

/// Fetches the official rate for a currency.
///
/// One GET per call, no authentication, no retry.
pub struct OfficialRateTool {
    client: Client,
    endpoint: String,
    currency: String,
    base_currency: String,
}

impl OfficialRateTool {
    pub fn new(config: &OfficialRateConfig) -> ConfigResult<Self> {
        let client = client_for("official rate client", config.timeout_secs)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            currency: config.currency.clone(),
            base_currency: config.base_currency.clone(),
        })
    }

    /// Fetch the rate for `currency`, or the configured default.
    pub async fn fetch(&self, currency: Option<&str>) -> Result<ExchangeRate, ToolError> {
        let currency = currency.unwrap_or(&self.currency).trim().to_uppercase();
        debug!(endpoint = %self.endpoint, %currency, "fetching official rate");

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| network_error("rate endpoint", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Network(format!(
                "rate endpoint returned status {status}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| network_error("rate endpoint", &e))?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| ToolError::Parse(format!("rate body is not JSON: {e}")))?;

        let rate = parse_rate_body(&body, &currency, &self.base_currency)?;
        info!(pair = %rate.currency_pair, rate = rate.rate, as_of = %rate.as_of, "official rate fetched");
        Ok(rate)
    }
}

#[async_trait]
impl Tool for OfficialRateTool {
    /// Optional currency code hint.
    type Input = Option<String>;
    type Output = ExchangeRate;

    fn name(&self) -> &'static str {
        "official_rate"
    }

    async fn call(&self, input: Option<String>) -> Result<ExchangeRate, ToolError> {
        self.fetch(input.as_deref()).await
    }
}

/// Extract an [`ExchangeRate`] for `currency` from a rate document.
///
/// Accepts `{"Valute": {"USD": {"Value": 92.5, "Nominal": 1}}, "Date": ".."}`
/// and the looser `{"rates": {"USD": 92.5}, "date": ".."}` shape. Fails
/// with [`ToolError::Parse`] instead of ever returning a zero rate.
pub fn parse_rate_body(
    body: &Value,
    currency: &str,
    base_currency: &str,
) -> Result<ExchangeRate, ToolError> {
    let root = body
        .as_object()
        .ok_or_else(|| ToolError::Parse("rate body is not a JSON object".to_string()))?;

    let container = first_key(root, &RATE_CONTAINER_KEYS)
        .and_then(Value::as_object)
        .ok_or_else(|| ToolError::Parse("rate body has no rate table".to_string()))?;

    let entry = container
        .get(currency)
        .ok_or_else(|| ToolError::Parse(format!("no rate for currency {currency}")))?;

    let rate = match entry {
        Value::Number(n) => n.as_f64(),
        Value::Object(fields) => {
            let value = first_key(fields, &RATE_VALUE_KEYS).and_then(Value::as_f64);
            let nominal = first_key(fields, &NOMINAL_KEYS)
                .and_then(Value::as_f64)
                .filter(|n| *n > 0.0)
                .unwrap_or(1.0);
            value.map(|v| v / nominal)
        }
        _ => None,
    }
    .ok_or_else(|| ToolError::Parse(format!("rate for {currency} is not numeric")))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(ToolError::Parse(format!(
            "rate for {currency} must be positive, got {rate}"
        )));
    }

    let date = first_key(root, &DATE_KEYS)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ToolError::Parse("rate body has no date".to_string()))?;
    let as_of = date.split('T').next().unwrap_or(date).to_string();

    Ok(ExchangeRate {
        currency_pair: format!("{currency}/{base_currency}"),
        rate,
        as_of,
    })
}

fn first_key<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}
