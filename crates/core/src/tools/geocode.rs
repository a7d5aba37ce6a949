//! Address geocoding backed by the Geoapify geocoding API.
//!
//! The engine uses the result only to bias the place search toward the
//! operator's city. A failed lookup leaves the search unbiased.

use crate::config::ConfigResult;
use crate::tools::base::{Tool, ToolError};
use crate::tools::http::{client_for, network_error};
use async_trait::async_trait;
use fx_protocol::config_models::GeocodeConfig;
use fx_protocol::geo_models::GeoLocation;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<FeatureProperties>,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    country: Option<String>,
    formatted: Option<String>,
}

/// Resolves a free-text address to coordinates.
///
/// One GET per call with the key in the query string, asking for the
/// single best match. No retry.
pub struct GeocodeTool {
    client: Client,
    endpoint: String,
    api_key: String,
    lang: String,
}

impl GeocodeTool {
    pub fn new(config: &GeocodeConfig, api_key: impl Into<String>) -> ConfigResult<Self> {
        let client = client_for("geocoder client", config.timeout_secs)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            lang: config.lang.clone(),
        })
    }

    pub async fn locate(&self, address: &str) -> Result<GeoLocation, ToolError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ToolError::EmptyResult(String::new()));
        }
        debug!(endpoint = %self.endpoint, "geocoding address");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("text", address),
                ("lang", self.lang.as_str()),
                ("limit", "1"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| network_error("geocoder", &e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(%status, "geocoder rejected the key");
            return Err(ToolError::Auth(format!(
                "geocoder rejected the key (status {status})"
            )));
        }
        if !status.is_success() {
            return Err(ToolError::Network(format!(
                "geocoder returned status {status}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| network_error("geocoder", &e))?;
        let parsed: GeocodeResponse = serde_json::from_str(&text)
            .map_err(|e| ToolError::Parse(format!("geocoder response is not valid: {e}")))?;

        let location = location_from(parsed, address)?;
        info!(lat = location.lat, lon = location.lon, "address geocoded");
        Ok(location)
    }
}

#[async_trait]
impl Tool for GeocodeTool {
    /// The address text.
    type Input = String;
    type Output = GeoLocation;

    fn name(&self) -> &'static str {
        "geocoder"
    }

    async fn call(&self, input: String) -> Result<GeoLocation, ToolError> {
        self.locate(&input).await
    }
}

fn location_from(response: GeocodeResponse, address: &str) -> Result<GeoLocation, ToolError> {
    let properties = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| ToolError::EmptyResult(address.to_string()))?
        .properties
        .ok_or_else(|| ToolError::Parse("geocoder match has no properties".to_string()))?;

    let (Some(lat), Some(lon)) = (properties.lat, properties.lon) else {
        return Err(ToolError::Parse(
            "geocoder match has no coordinates".to_string(),
        ));
    };

    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let location = GeoLocation {
        lat,
        lon,
        city: non_blank(properties.city),
        country: non_blank(properties.country),
        formatted: non_blank(properties.formatted),
    };
    if !location.is_valid() {
        return Err(ToolError::Parse(format!(
            "coordinates out of range: {lat}, {lon}"
        )));
    }
    Ok(location)
}
