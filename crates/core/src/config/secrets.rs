//! Credentials read from the process environment.

use crate::config::error::{ConfigError, ConfigResult};
use std::fmt;
use tracing::debug;

/// Environment variables checked, in order, for the language-model key.
pub const LLM_KEY_VARS: [&str; 2] = ["CLOUD_RU_API_KEY", "API_KEY"];

/// Environment variable holding the search API key.
pub const SEARCH_KEY_VAR: &str = "SERPER_API_KEY";

/// Environment variable holding the optional geocoder key.
pub const GEOCODE_KEY_VAR: &str = "GEOAPIFY_API_KEY";

/// API keys needed by the network stages.
///
/// Collected once at startup and handed to the constructors that need
/// them. `Debug` never prints the values.
#[derive(Clone, Default)]
pub struct Secrets {
    llm_api_key: Option<String>,
    search_api_key: Option<String>,
    geocode_api_key: Option<String>,
}

impl Secrets {
    pub fn new(llm_api_key: Option<String>, search_api_key: Option<String>) -> Self {
        let keep = |k: Option<String>| k.filter(|v| !v.trim().is_empty());
        Self {
            llm_api_key: keep(llm_api_key),
            search_api_key: keep(search_api_key),
            geocode_api_key: None,
        }
    }

    /// Add the geocoder key. Blank values count as unset.
    pub fn with_geocode_key(mut self, key: Option<String>) -> Self {
        self.geocode_api_key = key.filter(|v| !v.trim().is_empty());
        self
    }

    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Self {
        match dotenv::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => debug!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read credentials through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm = LLM_KEY_VARS
            .iter()
            .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()));
        Self::new(llm, lookup(SEARCH_KEY_VAR)).with_geocode_key(lookup(GEOCODE_KEY_VAR))
    }

    pub fn llm_api_key(&self) -> Option<&str> {
        self.llm_api_key.as_deref()
    }

    pub fn search_api_key(&self) -> Option<&str> {
        self.search_api_key.as_deref()
    }

    pub fn geocode_api_key(&self) -> Option<&str> {
        self.geocode_api_key.as_deref()
    }

    pub fn require_llm(&self) -> ConfigResult<&str> {
        self.llm_api_key().ok_or_else(|| ConfigError::MissingSecret {
            var: LLM_KEY_VARS.join(" or "),
        })
    }

    pub fn require_search(&self) -> ConfigResult<&str> {
        self.search_api_key()
            .ok_or_else(|| ConfigError::MissingSecret {
                var: SEARCH_KEY_VAR.to_string(),
            })
    }

    pub fn require_geocode(&self) -> ConfigResult<&str> {
        self.geocode_api_key()
            .ok_or_else(|| ConfigError::MissingSecret {
                var: GEOCODE_KEY_VAR.to_string(),
            })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |k: &Option<String>| if k.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("llm_api_key", &mask(&self.llm_api_key))
            .field("search_api_key", &mask(&self.search_api_key))
            .field("geocode_api_key", &mask(&self.geocode_api_key))
            .finish()
    }
}
