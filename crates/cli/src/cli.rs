//! Command-line arguments.

use crate::commands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Where near me should I exchange USD/RUB?
#[derive(Parser, Debug)]
#[command(name = "fx-advisor", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project directory containing `.fx-advisor/` (default: current directory).
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full advisor pipeline.
    Run {
        /// Use this address instead of prompting for one.
        #[arg(long)]
        address: Option<String>,

        /// Role from `.fx-advisor/agents/` to write the recommendation.
        #[arg(long)]
        role: Option<String>,

        /// Skip the language model; print the collected data only.
        #[arg(long)]
        no_llm: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Fetch the official exchange rate.
    Rate {
        /// Currency code, e.g. EUR (default from config).
        #[arg(long)]
        currency: Option<String>,
    },
    /// Search for places.
    Search {
        /// Free-text query.
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Locate an address with the geocoder.
    Geocode {
        /// Free-text address.
        #[arg(required = true)]
        address: Vec<String>,
    },
    /// Look up demo bank quotes.
    Banks {
        /// Bank names, matched case-insensitively.
        #[arg(required = true)]
        names: Vec<String>,

        /// Rescale the table to this official rate.
        #[arg(long)]
        anchor: Option<f64>,
    },
    /// List configured roles.
    Roles,
    /// Create a `.fx-advisor/` directory from templates.
    Init {
        /// Overwrite an existing directory.
        #[arg(long)]
        force: bool,

        /// Only write config.toml and the advisor role.
        #[arg(long)]
        minimal: bool,
    },
}

impl Cli {
    pub async fn run(self) -> color_eyre::Result<()> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };

        match self.command {
            Command::Run {
                address,
                role,
                no_llm,
                json,
            } => {
                let args = commands::RunArgs {
                    address,
                    role,
                    no_llm,
                    json,
                };
                commands::run(&root, args).await
            }
            Command::Rate { currency } => commands::rate(&root, currency).await,
            Command::Search { query } => commands::search(&root, &query.join(" ")).await,
            Command::Geocode { address } => commands::geocode(&root, &address.join(" ")).await,
            Command::Banks { names, anchor } => commands::banks(&root, &names, anchor).await,
            Command::Roles => commands::roles(&root).await,
            Command::Init { force, minimal } => commands::init(root, force, minimal).await,
        }
    }
}
