//! `fx-advisor` binary entry point.

mod cli;
mod commands;
mod render;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Diagnostics go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    cli::Cli::parse().run().await
}
