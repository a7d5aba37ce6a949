//! Subcommand implementations.

use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use colored::Colorize;
use fx_core::agents::RoleRegistry;
use fx_core::config::{load_config, AppConfig, Secrets};
use fx_core::engine::{AdvisorEngine, EngineOptions};
use fx_core::init::{generate_config_structure, InitOptions};
use fx_core::tools::{
    BankRateTool, GeocodeTool, OfficialRateTool, PlaceSearchTool, SearchRequest, Tool,
};
use fx_protocol::query_models::UserQuery;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::debug;

pub struct RunArgs {
    pub address: Option<String>,
    pub role: Option<String>,
    pub no_llm: bool,
    pub json: bool,
}

pub async fn run(root: &Path, args: RunArgs) -> Result<()> {
    let config = load_config(root).await?;
    let secrets = Secrets::from_env();
    let options = EngineOptions {
        role: args.role,
        no_llm: args.no_llm,
    };
    let engine = AdvisorEngine::from_config(&config, &secrets, &options)?;
    debug!(role = %engine.role().name, llm = engine.has_model(), "engine ready");

    let (events_tx, events_rx) = mpsc::channel(64);
    let (result, ()) = tokio::join!(
        engine.run(args.address.map(UserQuery::new), events_tx),
        render::print_events(events_rx)
    );
    let (_run, report) = result.map_err(|e| eyre!(e))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        print!("{}", render::colorize_report(&report, &engine.role().color));
    }
    Ok(())
}

pub async fn rate(root: &Path, currency: Option<String>) -> Result<()> {
    let config = load_config(root).await?;
    let tool = OfficialRateTool::new(&config.global.official_rate)?;
    let rate = tool.call(currency).await?;
    println!("{rate}");
    Ok(())
}

pub async fn search(root: &Path, query: &str) -> Result<()> {
    let config = load_config(root).await?;
    let secrets = Secrets::from_env();
    let key = secrets.require_search()?.to_string();

    let tool = PlaceSearchTool::new(&config.global.search, Some(key))?;
    let places = tool.call(SearchRequest::new(query)).await?;
    for (i, place) in places.iter().enumerate() {
        println!("{}. {}", i + 1, place.name.bold());
        if !place.address.is_empty() {
            println!("   {}", place.address);
        }
        if let Some(link) = &place.link {
            println!("   {}", link.dimmed());
        }
    }
    Ok(())
}

pub async fn geocode(root: &Path, address: &str) -> Result<()> {
    let config = load_config(root).await?;
    let secrets = Secrets::from_env();
    let key = secrets.require_geocode()?;

    let tool = GeocodeTool::new(&config.global.geocode, key)?;
    let location = tool.call(address.to_string()).await?;
    println!("{location}");
    if let Some(hint) = location.search_hint() {
        println!("   search bias: {}", hint.dimmed());
    }
    Ok(())
}

pub async fn banks(root: &Path, names: &[String], anchor: Option<f64>) -> Result<()> {
    let config = load_config(root).await?;
    let mut table = bank_table(&config)?;
    if let Some(rate) = anchor {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(eyre!("--anchor must be a positive rate, got {rate}"));
        }
        table = table.anchored_to(rate);
    }

    for lookup in table.call(names.to_vec()).await? {
        println!("{}", render::lookup_line(&lookup));
    }
    Ok(())
}

pub async fn roles(root: &Path) -> Result<()> {
    let config = load_config(root).await?;
    let registry = RoleRegistry::new(config.agents);
    let names = registry.list_roles();

    if names.is_empty() {
        println!("No roles configured; the built-in advisor is used.");
        return Ok(());
    }
    for name in names {
        let description = registry
            .get(&name)
            .map(|role| role.description.as_str())
            .unwrap_or_default();
        println!("{}  {}", name.bold(), description);
    }
    Ok(())
}

pub async fn init(root: PathBuf, force: bool, minimal: bool) -> Result<()> {
    let options = InitOptions {
        target_dir: root,
        force,
        minimal,
    };
    let written = generate_config_structure(options).await?;

    println!("{}", "Created .fx-advisor/".green().bold());
    for path in written {
        println!("  {path}");
    }
    println!("Set SERPER_API_KEY and CLOUD_RU_API_KEY (or API_KEY) before `fx-advisor run`.");
    println!("GEOAPIFY_API_KEY is optional and biases the search toward your city.");
    Ok(())
}

fn bank_table(config: &AppConfig) -> Result<BankRateTool> {
    match &config.banks {
        Some(table) => Ok(BankRateTool::from_table(table)?),
        None => Ok(BankRateTool::builtin()),
    }
}
