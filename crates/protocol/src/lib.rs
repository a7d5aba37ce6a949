//! # fx-protocol
//!
//! Shared data models for fx-advisor.
//!
//! This crate defines the structures exchanged between the pipeline
//! stages, the configuration files, and the CLI:
//! - Value types produced by the tools (rates, places, quotes, operator input)
//! - Configuration file models (`config.toml`, `banks.yaml`, `agents/*.md`)
//! - Runtime run state and progress events
//!
//! ## Modules
//!
//! - [`rate_models`]: Official exchange rate
//! - [`geo_models`]: Geocoded address location
//! - [`place_models`]: Search-derived place candidates
//! - [`quote_models`]: Bank buy/sell quotes and lookup results
//! - [`query_models`]: Operator input
//! - [`agent_models`]: Agent role definitions
//! - [`config_models`]: Settings from `config.toml` and `banks.yaml`
//! - [`run_models`]: Run state and pipeline stages
//! - [`ipc`]: Progress events emitted by the engine
//!
//! ## Design Principles
//!
//! - Minimal dependencies: serde, uuid, chrono
//! - Every entity is a transient value; nothing here is persisted

pub mod agent_models;
pub mod config_models;
pub mod geo_models;
pub mod ipc;
pub mod place_models;
pub mod query_models;
pub mod quote_models;
pub mod rate_models;
pub mod run_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use config_models::*;
pub use geo_models::*;
pub use ipc::*;
pub use place_models::*;
pub use query_models::*;
pub use quote_models::*;
pub use rate_models::*;
pub use run_models::*;
