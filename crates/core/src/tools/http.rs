//! Shared HTTP client construction.
//!
//! Every network tool owns a client with a bounded request timeout. The
//! clients share the same pool settings.

use crate::config::{ConfigError, ConfigResult};
use crate::tools::base::ToolError;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("fx-advisor/", env!("CARGO_PKG_VERSION"));

/// Build a client whose requests time out after `timeout_secs`.
pub fn build_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(Duration::from_secs(timeout_secs.clamp(1, 10)))
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
}

/// Build the client for `component`, reporting a failure as a setup
/// problem rather than a network one.
pub fn client_for(component: &str, timeout_secs: u64) -> ConfigResult<Client> {
    build_client(timeout_secs).map_err(|e| setup_failure(component, e))
}

pub fn setup_failure(component: &str, error: impl std::fmt::Display) -> ConfigError {
    ConfigError::Setup {
        component: component.to_string(),
        reason: error.to_string(),
    }
}

/// Map a transport error onto [`ToolError::Network`].
pub fn network_error(service: &str, err: &reqwest::Error) -> ToolError {
    if err.is_timeout() {
        ToolError::Network(format!("{service} request timed out"))
    } else if err.is_connect() {
        ToolError::Network(format!("{service} is unreachable: {err}"))
    } else {
        ToolError::Network(format!("{service} request failed: {err}"))
    }
}
