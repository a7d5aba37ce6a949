//! Configuration models for `.fx-advisor/config.toml` and `banks.yaml`.
//!
//! Every section and field has a default, so an empty or missing
//! `config.toml` yields a working configuration.

use serde::{Deserialize, Serialize};

/// Settings from `.fx-advisor/config.toml`.
///
/// # Example
///
/// ```toml
/// [llm]
/// model = "zai-org/GLM-4.5"
/// temperature = 0.5
///
/// [search]
/// max_results = 5
/// radius_km = 5
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    pub llm: LlmConfig,
    pub official_rate: OfficialRateConfig,
    pub search: SearchConfig,
    pub geocode: GeocodeConfig,
    pub prompt: PromptConfig,
    pub bank_rates: BankRatesConfig,
}

/// OpenAI-compatible chat completion endpoint settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub timeout_secs: u64,
    /// Extra attempts after a transport error, HTTP 429 or 5xx.
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://foundation-models.api.cloud.ru/v1".to_string(),
            model: "zai-org/GLM-4.5".to_string(),
            temperature: 0.5,
            max_tokens: 5000,
            top_p: 0.95,
            presence_penalty: 0.0,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Official rate endpoint settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OfficialRateConfig {
    pub endpoint: String,
    /// Currency looked up in the rate container (e.g. `USD`).
    pub currency: String,
    /// Currency the rate is expressed in (e.g. `RUB`).
    pub base_currency: String,
    pub timeout_secs: u64,
}

impl Default for OfficialRateConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.cbr-xml-daily.ru/daily_json.js".to_string(),
            currency: "USD".to_string(),
            base_currency: "RUB".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Search API settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    /// Value sent as `num`: how many results the API should return.
    pub results_requested: u32,
    /// Upper bound on the number of places handed to later stages.
    pub max_results: usize,
    /// Radius mentioned in the query text. Not verified by the tool.
    pub radius_km: u32,
    /// Query template with `{radius_km}` and `{address}` placeholders.
    pub query_template: String,
    pub location: Option<String>,
    pub gl: Option<String>,
    pub hl: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://google.serper.dev/search".to_string(),
            results_requested: 10,
            max_results: 5,
            radius_km: 5,
            query_template: "банки в радиусе {radius_km} км от {address}".to_string(),
            location: None,
            gl: Some("ru".to_string()),
            hl: Some("ru".to_string()),
            timeout_secs: 15,
        }
    }
}

impl SearchConfig {
    /// Render the query for an address using `query_template`.
    pub fn render_query(&self, address: &str) -> String {
        self.query_template
            .replace("{radius_km}", &self.radius_km.to_string())
            .replace("{address}", address)
    }
}

/// Geocoder settings. The stage only runs when `GEOAPIFY_API_KEY` is set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeocodeConfig {
    pub endpoint: String,
    /// Language of the returned place names.
    pub lang: String,
    pub timeout_secs: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.geoapify.com/v1/geocode/search".to_string(),
            lang: "ru".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Operator prompt settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PromptConfig {
    pub text: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            text: "Введите ваш адрес".to_string(),
        }
    }
}

/// Demo bank rate behaviour.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BankRatesConfig {
    /// Rescale the demo table to the official rate when it is available.
    pub anchor_to_official: bool,
}

impl Default for BankRatesConfig {
    fn default() -> Self {
        Self {
            anchor_to_official: true,
        }
    }
}

/// One row of the demo bank table in `banks.yaml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BankEntry {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub buy: f64,
    pub sell: f64,
}

/// Contents of `.fx-advisor/banks.yaml`.
///
/// # Example
///
/// ```yaml
/// reference-rate: 92.5
/// banks:
///   - name: Сбербанк
///     aliases: [Sberbank, СберБанк]
///     buy: 91.8
///     sell: 94.2
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct BankTableConfig {
    /// Official rate the demo quotes were written against.
    pub reference_rate: f64,
    pub banks: Vec<BankEntry>,
}
