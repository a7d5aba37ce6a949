//! Configuration models that aggregate all settings.

use fx_protocol::agent_models::AgentRole;
use fx_protocol::config_models::{BankTableConfig, GlobalConfig};

/// Unified application configuration loaded from `.fx-advisor/`.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings
/// - `banks.yaml`: Demo bank table (optional, built-in table otherwise)
/// - `agents/*.md`: Role definitions
///
/// Credentials are not part of this struct; see [`super::Secrets`].
///
/// # Example
///
/// ```rust,no_run
/// use fx_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} roles", config.agents.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Settings from `config.toml`.
    pub global: GlobalConfig,

    /// Table from `banks.yaml`, if the file exists.
    pub banks: Option<BankTableConfig>,

    /// Role definitions loaded from `agents/*.md`.
    pub agents: Vec<AgentRole>,
}
