//! Configuration file loader for the `.fx-advisor/` directory.
//!
//! This module loads and parses:
//! - `config.toml`: Global settings
//! - `banks.yaml`: Demo bank table
//! - `agents/*.md`: Role definitions with YAML front matter

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use crate::config::CONFIG_DIR;
use fx_protocol::agent_models::AgentRole;
use fx_protocol::config_models::{BankTableConfig, GlobalConfig};
use gray_matter::engine::YAML;
use gray_matter::Matter;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Loads all configuration from the `.fx-advisor/` directory under `root`.
///
/// Missing files and directories fall back to defaults: no `config.toml`
/// means default settings, no `banks.yaml` means the built-in table, no
/// `agents/` means the built-in role.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML, YAML, or Markdown front matter)
/// - Values are out of range (e.g. `max_results = 0`)
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let fx_dir = root.join(CONFIG_DIR);

    if !fx_dir.exists() {
        debug!(dir = %fx_dir.display(), "no config directory, using defaults");
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&fx_dir)?;
    let banks = load_bank_table(&fx_dir)?;
    let agents = load_agents(&fx_dir)?;

    info!(
        dir = %fx_dir.display(),
        roles = agents.len(),
        custom_banks = banks.is_some(),
        "configuration loaded"
    );

    Ok(AppConfig {
        global,
        banks,
        agents,
    })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(fx_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = fx_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    validate_global(&config).map_err(|reason| ConfigError::InvalidConfig {
        path: config_path,
        reason,
    })?;

    Ok(config)
}

/// Upper bound for `[llm] max_retries`.
pub const MAX_LLM_RETRIES: u32 = 10;

fn validate_global(config: &GlobalConfig) -> Result<(), String> {
    if config.llm.max_retries > MAX_LLM_RETRIES {
        return Err(format!(
            "llm.max_retries must be at most {MAX_LLM_RETRIES}, got {}",
            config.llm.max_retries
        ));
    }
    if config.search.max_results == 0 {
        return Err("search.max_results must be at least 1".to_string());
    }
    if config.official_rate.currency.trim().is_empty() {
        return Err("official_rate.currency must not be empty".to_string());
    }
    if !config.search.query_template.contains("{address}") {
        return Err("search.query_template must contain {address}".to_string());
    }
    for (name, url) in [
        ("llm.base_url", &config.llm.base_url),
        ("official_rate.endpoint", &config.official_rate.endpoint),
        ("search.endpoint", &config.search.endpoint),
        ("geocode.endpoint", &config.geocode.endpoint),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("{name} must be an http(s) URL, got '{url}'"));
        }
    }
    Ok(())
}

/// Loads the demo bank table from `banks.yaml`, if present.
fn load_bank_table(fx_dir: &Path) -> ConfigResult<Option<BankTableConfig>> {
    let banks_path = fx_dir.join("banks.yaml");

    if !banks_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&banks_path).map_err(|source| ConfigError::FileRead {
        path: banks_path.clone(),
        source,
    })?;

    let table: BankTableConfig =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
            path: banks_path.clone(),
            source,
        })?;

    if !(table.reference_rate.is_finite() && table.reference_rate > 0.0) {
        return Err(ConfigError::InvalidConfig {
            path: banks_path,
            reason: "reference-rate must be a positive number".to_string(),
        });
    }

    Ok(Some(table))
}

/// Loads all role definitions from `agents/*.md`.
fn load_agents(fx_dir: &Path) -> ConfigResult<Vec<AgentRole>> {
    let agents_dir = fx_dir.join("agents");

    if !agents_dir.exists() {
        return Ok(Vec::new());
    }

    let mut agents = Vec::new();

    for entry in WalkDir::new(&agents_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: agents_dir.clone(),
            source,
        })?;

        let path = entry.path();

        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let matter = Matter::<YAML>::new();
        let result = matter.parse(&content);

        let mut agent: AgentRole = result
            .data
            .ok_or_else(|| ConfigError::MarkdownParse {
                path: path.to_path_buf(),
                reason: "Missing YAML front matter".to_string(),
            })?
            .deserialize()
            .map_err(|e| ConfigError::MarkdownParse {
                path: path.to_path_buf(),
                reason: format!("Failed to deserialize front matter: {e}"),
            })?;

        agent.system_prompt = result.content.trim().to_string();
        agents.push(agent);
    }

    Ok(agents)
}
